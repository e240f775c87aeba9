// Library root
// -----------
// Interactive examples for the BlueInk e-signature API. The binary
// (`main.rs`) wires these modules together.
//
// Module responsibilities:
// - `api`: the `BlueinkApi` trait and its blocking HTTP implementation.
// - `helpers`: payload builders for bundles and persons.
// - `prompt`: line-based prompts and numbered menus.
// - `ui`: the example flows, written against `BlueinkApi` and `prompt`.
// - `config`, `error`, `models`: settings, error enums, API records.
pub mod api;
pub mod config;
pub mod error;
pub mod helpers;
pub mod models;
pub mod prompt;
pub mod ui;
