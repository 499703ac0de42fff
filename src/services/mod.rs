pub mod cache_service;
pub mod navigation_service;
pub mod upload_service;
