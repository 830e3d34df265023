use anyhow::{bail, Result as Fallible};
use psdb_core::{entities::UserRef, gateways::auth::AuthProvider};

/// Identity provider with a single, preconfigured account.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    account: UserRef,
}

impl StaticIdentityProvider {
    pub fn new(account: UserRef) -> Self {
        Self { account }
    }
}

impl AuthProvider for StaticIdentityProvider {
    fn sign_in(&self) -> Fallible<UserRef> {
        if !self.account.id.is_valid() {
            bail!("No account has been configured");
        }
        log::info!("Signed in as {}", self.account.display_name);
        Ok(self.account.clone())
    }

    fn sign_out(&self, user: &UserRef) -> Fallible<()> {
        if user.id != self.account.id {
            bail!("Unknown account {}", user.id);
        }
        log::info!("Signed out {}", user.display_name);
        Ok(())
    }
}
