pub mod mock_messaging_provider;

pub use mock_messaging_provider::MockMessagingProvider;
