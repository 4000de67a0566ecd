//! Wallet sign-in state as seen by the event loop.

use rust_decimal::Decimal;

use crate::domain::Address;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginPhase {
    #[default]
    Disconnected,
    /// Connect, sign and token exchange in flight.
    SigningIn,
    SignedIn,
}

/// Who is signed in, if anyone.
///
/// Cart, offers, profile edits and item creation all require
/// [`SessionState::is_connected`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: LoginPhase,
    pub address: Option<Address>,
    /// Native balance in ether, once fetched.
    pub balance: Option<Decimal>,
}

impl SessionState {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.phase == LoginPhase::SignedIn && self.address.is_some()
    }

    pub fn begin_sign_in(&mut self) {
        self.phase = LoginPhase::SigningIn;
    }

    pub fn signed_in(&mut self, address: Address) {
        self.phase = LoginPhase::SignedIn;
        self.address = Some(address);
        self.balance = None;
    }

    pub fn signed_out(&mut self) {
        *self = Self::default();
    }
}
