pub use self::amount::{AssetAmount, FiatAmount};
pub use self::lot::{AcquisitionLot, DisposalLot};
pub use self::report::{HoldTerm, LineItem, Report};
pub use self::transaction::{parse_all, CurrencyPair, RawTransaction, Transaction};
pub use self::transaction::{TxCategory, TxType};

pub mod amount;
pub mod lot;
pub mod report;
pub mod transaction;
