//! Prints a salted hash for seeding an admin row by hand:
//! `hash_password <plaintext>` or `echo <plaintext> | hash_password`.

use std::io::BufRead;

use anyhow::Context;
use booking_backend::auth::password::hash_password;

fn main() -> anyhow::Result<()> {
    let plain = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    anyhow::ensure!(!plain.is_empty(), "password must not be empty");

    println!("{}", hash_password(&plain)?);
    Ok(())
}
