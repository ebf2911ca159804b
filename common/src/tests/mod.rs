mod http_status;
mod error_location;
