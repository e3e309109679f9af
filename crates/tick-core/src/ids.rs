//! Opaque id generation for todos and categories.

use rand::Rng;

/// Kinds of entity that receive generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Todo,
    Category,
}

impl IdKind {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Todo => "t",
            Self::Category => "c",
        }
    }
}

/// Supplier of unique opaque ids.
pub trait IdSource: Send {
    fn next_id(&mut self, kind: IdKind) -> String;
}

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_LEN: usize = 8;

/// Random base-36 ids such as `t-k3v9x0qa`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RANDOM_LEN)
            .map(|_| char::from(ALPHABET[rng.gen_range(0..ALPHABET.len())]))
            .collect();
        format!("{}-{suffix}", kind.prefix())
    }
}

/// Deterministic `t-1`, `t-2`, `c-1`, ... ids for tests and simulations.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    todos: u64,
    categories: u64,
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, kind: IdKind) -> String {
        let counter = match kind {
            IdKind::Todo => &mut self.todos,
            IdKind::Category => &mut self.categories,
        };
        *counter += 1;
        format!("{}-{counter}", kind.prefix())
    }
}
