pub mod profile_reader;
