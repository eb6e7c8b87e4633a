use anyhow::{anyhow, Error};

pub type Address = [u8; 20];
pub type Balance = u128;
pub type Nonce = u64;
pub type Gas = u64;

pub type BlockNumber = u64;
pub type BlockHash = [u8; 32];
pub type BlockTimeStamp = u64;
pub type TransactionHash = [u8; 32];

pub type CodeId = u64;
pub type ReplyId = u64;

pub type StorageKey = Vec<u8>;
pub type StorageValue = Vec<u8>;
pub type Payload = Vec<u8>;
pub type ReturnData = Vec<u8>;

pub const ADDRESS_LEN: usize = 20;

pub fn address_from_hex(s: &str) -> Result<Address, Error> {
	let bytes = hex::decode(s.trim_start_matches("0x"))
		.map_err(|e| anyhow!("Invalid hex address {}: {}", s, e))?;
	let bytes: Address = bytes
		.try_into()
		.map_err(|_| anyhow!("Invalid address length, expected {} bytes: {}", ADDRESS_LEN, s))?;
	Ok(bytes)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_address_from_hex() {
		let address = address_from_hex("75104938baa47c54a86004ef998cc76c2e616289").unwrap();
		assert_eq!(address[0], 0x75);
		assert_eq!(address[19], 0x89);

		let address = address_from_hex("0x75104938baa47c54a86004ef998cc76c2e616289").unwrap();
		assert_eq!(address[0], 0x75);

		assert!(address_from_hex("75104938").is_err());
		assert!(address_from_hex("zz104938baa47c54a86004ef998cc76c2e616289").is_err());
	}
}
