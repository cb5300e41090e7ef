pub mod client_ip;
pub mod honeypot;
pub mod parser;
pub mod pipeline;
