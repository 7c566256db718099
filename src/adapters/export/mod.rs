pub mod csv_export;

pub use csv_export::{export_file_name, memberships_to_csv};
