//! Author-name resolution capability.

use std::future::Future;

/// Resolves a user id to a human-readable display name.
///
/// Implementations are best-effort: transport failures are swallowed (logged
/// by the implementation) and surface as `None`, never as errors. The
/// dispatcher falls back group-member profile → global profile → omit the
/// author, so a resolution failure can never abort a reply.
pub trait ProfileResolver: Send + Sync {
  /// Display name via the owning group's membership.
  fn member_display_name<'a>(
    &'a self,
    groupid: &'a str,
    userid: &'a str,
  ) -> impl Future<Output = Option<String>> + Send + 'a;

  /// Display name from the user's global profile.
  fn display_name<'a>(
    &'a self,
    userid: &'a str,
  ) -> impl Future<Output = Option<String>> + Send + 'a;
}
