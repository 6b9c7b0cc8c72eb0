//! # Sigelo (Single Sign-On token authority)
//!
//! `sigelo` authenticates end users by password on behalf of multiple
//! registered client applications and issues a pair of signed, time-bounded
//! bearer tokens scoped to the requesting app.
//!
//! ## Token model
//!
//! Every app carries two independent signing secrets: one for short-lived
//! access tokens, one for longer-lived refresh tokens. A token is bound to
//! its type by the secret that signed it, so a refresh token can never be
//! replayed as an access token. Tokens are self-contained; validity is
//! decided by signature and expiry alone, with no session store, which also
//! means an issued token cannot be revoked before its expiry.
//!
//! ## Failure vocabulary
//!
//! Every operation returns one of a closed set of classified error kinds.
//! Unknown emails and wrong passwords collapse into a single kind, and a
//! refresh for a deleted user is indistinguishable from a forged token, so
//! callers cannot probe for account existence or lifecycle.

pub mod auth;
pub mod cli;
pub mod sigelo;
pub mod store;
