pub mod data_uri;
