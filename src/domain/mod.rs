pub mod operation;

pub use operation::OperationKind;
