// Adapters layer: concrete clients for the external services behind the domain ports.

pub mod nominatim;
pub mod openai;

pub use nominatim::NominatimLookup;
pub use openai::OpenAiClient;
