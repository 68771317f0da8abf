//! `slink option <key>` – print an option's effective value.

use slink_core::Session;

pub fn run_option(session: &Session, key: &str) {
    println!("{}", session.get_option(key));
}
