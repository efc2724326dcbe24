pub mod session;

pub use session::{AnalysisSessionHolder, AnalysisState, RequestTicket, SessionSnapshot};
