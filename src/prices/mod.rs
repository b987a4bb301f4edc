//! External price series: storage, loading, lookup capability and nearest-date alignment

mod align;
mod history;
pub mod loader;
mod source;

pub use align::{align_prices_to_dates, nearest_index};
pub use history::{midnight, PriceHistory, CLOSE};
pub use loader::{load_price_history, load_price_history_from_reader};
pub use source::{CsvPriceSource, InMemoryPriceSource, PriceSource};
