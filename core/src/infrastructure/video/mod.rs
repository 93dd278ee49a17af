pub mod youtube_client;

pub use youtube_client::YoutubeVideoLookup;
