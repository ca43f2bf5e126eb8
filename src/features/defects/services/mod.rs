mod defect_service;
pub mod filter_engine;

pub use defect_service::DefectService;
