pub mod quote_service;
