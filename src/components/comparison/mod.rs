mod panel;
mod whitepaper;

pub use panel::ComparisonPanel;
pub use whitepaper::WhitepaperDialog;
