pub mod report_engine;
