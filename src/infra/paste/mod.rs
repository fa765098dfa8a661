pub mod hastebin_client;

pub use hastebin_client::HastebinClient;
