mod record_class;
mod record_type;
mod resource_record;
mod resource_records;

pub use record_class::RecordClass;
pub use record_type::RecordType;
pub use resource_record::{Question, ResourceRecord};
pub use resource_records::ResourceRecords;
