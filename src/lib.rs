// Library root
// -----------
// This crate exposes the pieces shared by the two binaries
// (`data-loader` and `upload-assignments`).
//
// Module responsibilities:
// - `transport`: the only code that talks HTTP; everything else goes
//   through the `Transport` trait so workflows can run against a fake.
// - `session`: form login with the CSRF cookie echoed back.
// - `forms`: finds a `<form>` in a page and collects the fields a browser
//   would submit.
// - `programs`, `loader`, `upload`: the three actions a run can perform.
// - `assignments`: reads the assignment CSV and groups it by section.
// - `ui`: terminal prompts, spinners and console output.
// - `config` / `logging`: command-line options and tracing setup.
pub mod assignments;
pub mod config;
pub mod forms;
pub mod loader;
pub mod logging;
pub mod programs;
pub mod session;
pub mod transport;
pub mod ui;
pub mod upload;
