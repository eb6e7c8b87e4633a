use primitives::BlockTimeStamp;

pub const EVENT_CHANNEL_CAPACITY: usize = 1_000;
pub const BLOCK_TIME_SECONDS: BlockTimeStamp = 1;
