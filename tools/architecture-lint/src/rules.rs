//! Rule table for `mailbox/src`.

use std::collections::BTreeSet;
use std::path::Path;

use crate::references::References;
use crate::{CRATE_NAME, Finding};

const LAYERS: [&str; 3] = ["domain", "inbound", "outbound"];

/// Which files a rule constrains, by path prefix under `mailbox/src`.
#[derive(Debug, Clone, Copy)]
pub enum Scope {
    /// Files under the given directory.
    Within(&'static str),
    /// Files outside every listed directory, including top-level files.
    Outside(&'static [&'static str]),
}

impl Scope {
    fn covers(self, file: &Path) -> bool {
        match self {
            Self::Within(dir) => file.starts_with(dir),
            Self::Outside(dirs) => !dirs.iter().any(|dir| file.starts_with(dir)),
        }
    }
}

/// What a constrained file must not reference.
#[derive(Debug, Clone, Copy)]
pub enum Forbidden {
    /// Top-level modules of the mailbox crate.
    Layers(&'static [&'static str]),
    /// External crates.
    Crates(&'static [&'static str]),
    /// Implementations of the named trait.
    TraitImpl(&'static str),
}

/// One boundary rule.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable identifier shown in findings.
    pub id: &'static str,
    /// Files the rule applies to.
    pub scope: Scope,
    /// References the rule rejects.
    pub forbidden: Forbidden,
}

/// Every rule the mailbox crate is held to.
pub const RULES: &[Rule] = &[
    Rule {
        id: "domain-is-adapter-free",
        scope: Scope::Within("domain"),
        forbidden: Forbidden::Layers(&["inbound", "outbound"]),
    },
    Rule {
        id: "domain-is-process-free",
        scope: Scope::Within("domain"),
        forbidden: Forbidden::Crates(&["color_eyre", "ortho_config", "tracing_subscriber", "url"]),
    },
    Rule {
        id: "inbound-skips-outbound",
        scope: Scope::Within("inbound"),
        forbidden: Forbidden::Layers(&["outbound"]),
    },
    Rule {
        id: "outbound-skips-inbound",
        scope: Scope::Within("outbound"),
        forbidden: Forbidden::Layers(&["inbound"]),
    },
    Rule {
        id: "outbound-is-process-free",
        scope: Scope::Within("outbound"),
        forbidden: Forbidden::Crates(&["color_eyre", "ortho_config", "tracing_subscriber"]),
    },
    Rule {
        id: "http-client-in-outbound",
        scope: Scope::Outside(&["outbound"]),
        forbidden: Forbidden::Crates(&["reqwest"]),
    },
    Rule {
        id: "regex-in-validators",
        scope: Scope::Outside(&["domain/validators"]),
        forbidden: Forbidden::Crates(&["regex"]),
    },
    Rule {
        id: "availability-port-implemented-by-adapters",
        scope: Scope::Outside(&["outbound", "domain/ports"]),
        forbidden: Forbidden::TraitImpl("MailboxAvailabilityChecker"),
    },
];

pub(crate) fn evaluate(file: &Path, references: &References) -> Vec<Finding> {
    let mut hits = BTreeSet::new();
    for rule in RULES.iter().filter(|rule| rule.scope.covers(file)) {
        match rule.forbidden {
            Forbidden::Layers(layers) => {
                for layer in references.paths.iter().filter_map(|path| layer_root(path)) {
                    if layers.contains(&layer) {
                        hits.insert((rule.id, format!("uses crate::{layer}")));
                    }
                }
            }
            Forbidden::Crates(crates) => {
                for name in references.paths.iter().filter_map(|path| external_root(path)) {
                    if crates.contains(&name) {
                        hits.insert((rule.id, format!("uses external crate `{name}`")));
                    }
                }
            }
            Forbidden::TraitImpl(name) => {
                if references.implemented_traits.contains(name) {
                    hits.insert((rule.id, format!("implements `{name}`")));
                }
            }
        }
    }

    hits.into_iter()
        .map(|(rule, detail)| Finding {
            file: file.to_path_buf(),
            rule,
            detail,
        })
        .collect()
}

fn is_relative(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Top-level layer a path lands in, if any.
///
/// Single-segment paths are locals or imported names, never module roots.
fn layer_root(path: &[String]) -> Option<&str> {
    if path.len() < 2 {
        return None;
    }
    let first = path.first()?.as_str();
    let root = if is_relative(first) {
        path.iter().map(String::as_str).find(|segment| !is_relative(segment))?
    } else if first == CRATE_NAME {
        path.get(1)?.as_str()
    } else {
        first
    };
    LAYERS.contains(&root).then_some(root)
}

/// External crate a path starts from, if any.
fn external_root(path: &[String]) -> Option<&str> {
    if path.len() < 2 {
        return None;
    }
    let first = path.first()?.as_str();
    (!is_relative(first) && first != CRATE_NAME && !LAYERS.contains(&first)).then_some(first)
}
