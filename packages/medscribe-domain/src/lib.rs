pub mod birth_date;
pub mod patient_code;
pub mod safety;
pub mod submission;
