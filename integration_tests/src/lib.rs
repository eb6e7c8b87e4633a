pub mod admin_group;
pub mod group_factory;

mod tests_admin;
