//! `fileguard set-password`: rotate the stored secret.

use std::sync::Arc;

use crate::config::ConfigLayout;
use crate::credential::{change_secret, CredentialStore};
use crate::error::GuardResult;
use crate::traits::Authenticator;

pub fn handle_set_password_command(
    layout: &ConfigLayout,
    authenticator: Arc<dyn Authenticator>,
) -> GuardResult<()> {
    layout.ensure_dirs()?;
    let store = CredentialStore::new(layout.password_file());
    change_secret(&store, authenticator)?;
    println!("Password updated");
    Ok(())
}
