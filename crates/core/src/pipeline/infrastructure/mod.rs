pub mod threaded_session_runner;
