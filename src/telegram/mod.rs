pub mod init_data;

pub use init_data::{InitData, TelegramUser, validate_init_data};
