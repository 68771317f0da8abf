//! `slink plugins` – list registered plugins.

use slink_core::Session;

pub fn run_plugins(session: &Session) {
    let plugins = session.get_plugins();
    if plugins.is_empty() {
        println!("No plugins registered.");
        return;
    }
    for id in plugins.keys() {
        println!("{id}");
    }
}
