/// Line command parsing and execution for the host console.
pub mod console;
/// Board session controller tying the stores and the state machine together.
pub mod session_service;
