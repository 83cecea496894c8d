pub mod edgar;

pub use edgar::EdgarProvider;
