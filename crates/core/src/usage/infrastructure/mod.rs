pub mod http_usage_reporter;
