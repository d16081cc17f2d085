pub mod stats_models;
