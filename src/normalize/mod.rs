pub mod currency;
pub mod text;

pub use currency::CurrencyNormalizer;
pub use text::TextNormalizer;
