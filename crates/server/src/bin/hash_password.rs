//! Print an argon2 hash for seeding an account by hand:
//! `hash-password 'secret' | psql -c "UPDATE users SET password_hash = ..."`.

use server::auth::password::hash_password;

fn main() {
    let Some(password) = std::env::args().nth(1) else {
        eprintln!("usage: hash-password <password>");
        std::process::exit(2);
    };
    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("failed to hash password: {}", e.message);
            std::process::exit(1);
        }
    }
}
