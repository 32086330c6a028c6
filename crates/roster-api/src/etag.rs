//! ETag computation for resolved memberships, and `If-None-Match` matching.
//!
//! The tag is a SHA-256 over the slot and serialized record of every person,
//! head first, then managers, then members. It covers everything the
//! membership body carries, so renaming or deactivating someone changes it.

use axum::http::{HeaderMap, header};
use roster_core::membership::ResolvedMembership;
use sha2::{Digest, Sha256};

/// Compute a quoted strong ETag for `membership`.
pub fn membership_etag(membership: &ResolvedMembership) -> serde_json::Result<String> {
  let head = membership.head.iter().map(|user| (b'h', user));
  let managers = membership.managers.iter().map(|user| (b'm', user));
  let members = membership.members.iter().map(|user| (b'u', user));

  let mut hasher = Sha256::new();
  for (slot, user) in head.chain(managers).chain(members) {
    hasher.update([slot]);
    hasher.update(serde_json::to_vec(user)?);
    hasher.update([0]);
  }
  Ok(format!("\"{}\"", hex::encode(hasher.finalize())))
}

/// Whether the request's `If-None-Match` header matches `etag`.
///
/// `*` matches any current representation. Listed tags use weak comparison,
/// so `W/"abc"` matches `"abc"`.
pub fn if_none_match(headers: &HeaderMap, etag: &str) -> bool {
  let opaque = |tag: &str| tag.trim().trim_start_matches("W/").to_owned();
  let etag = opaque(etag);

  headers
    .get_all(header::IF_NONE_MATCH)
    .iter()
    .filter_map(|value| value.to_str().ok())
    .flat_map(|value| value.split(','))
    .any(|tag| tag.trim() == "*" || opaque(tag) == etag)
}
