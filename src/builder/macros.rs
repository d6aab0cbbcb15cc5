//! Macros for ergonomic event declaration.

/// Declare a closed set of event tags with [`EventId`](crate::core::EventId)
/// implemented.
///
/// # Example
///
/// ```
/// use agent_fsm::core::EventId;
/// use agent_fsm::event_ids;
///
/// event_ids! {
///     pub enum SelfEventId {
///         OnHurt,
///         OnAttackEnd,
///     }
/// }
///
/// assert_eq!(SelfEventId::OnHurt.name(), "OnHurt");
/// ```
#[macro_export]
macro_rules! event_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::EventId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
