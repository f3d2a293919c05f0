pub mod bucket_matcher;
pub mod categorizer;
pub mod classifier;
pub mod due_date;
pub mod language_model;
pub mod organizer_service;
pub mod projections;
pub mod storage_service;
