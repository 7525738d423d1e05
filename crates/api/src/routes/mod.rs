pub mod form;
pub mod predictions;
pub mod reference;
