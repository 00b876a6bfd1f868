use chrono::Utc;
use tokio::sync::oneshot;

use crate::transfer::retain_importable;
use crate::{AutoresponderError, Rule, RuleInput, validate};

pub(crate) type Reply<T> = oneshot::Sender<Result<T, AutoresponderError>>;

/// Messages accepted by the engine task.
pub(crate) enum Command {
    Edit { edit: Edit, reply: Reply<Vec<Rule>> },
    SetEnabled { enabled: bool, reply: Reply<()> },
}

/// A change to the rule list.
///
/// Applied to a copy of the current list; the engine commits the result only
/// after it has been compiled, persisted and installed.
#[derive(Debug, Clone)]
pub(crate) enum Edit {
    Replace(Vec<Rule>),
    Add(RuleInput),
    Update { index: usize, input: RuleInput },
    Delete(usize),
    DeleteMany(Vec<usize>),
    Import(Vec<Rule>),
    Duplicate(usize),
    SetEnabled { indices: Vec<usize>, enabled: bool },
}

impl Edit {
    pub(crate) fn apply(self, rules: &[Rule]) -> Result<Vec<Rule>, AutoresponderError> {
        let mut next = rules.to_vec();
        match self {
            Edit::Replace(replacement) => next = replacement,
            Edit::Add(input) => next.push(validate(input)?),
            Edit::Update { index, input } => {
                let revised = get(&next, index)?.revise(input)?;
                next[index] = revised;
            }
            Edit::Delete(index) => {
                get(&next, index)?;
                next.remove(index);
            }
            Edit::DeleteMany(mut indices) => {
                check_all(&next, &indices)?;
                indices.sort_unstable_by(|a, b| b.cmp(a));
                indices.dedup();
                for index in indices {
                    next.remove(index);
                }
            }
            Edit::Import(imported) => next.extend(retain_importable(imported)),
            Edit::Duplicate(index) => {
                let mut copy = get(&next, index)?.clone();
                let now = Utc::now();
                copy.note = if copy.note.is_empty() {
                    "(copy)".to_owned()
                } else {
                    format!("{} (copy)", copy.note)
                };
                copy.created_at = now;
                copy.updated_at = now;
                next.push(copy);
            }
            Edit::SetEnabled { indices, enabled } => {
                check_all(&next, &indices)?;
                for index in indices {
                    next[index].enabled = enabled;
                }
            }
        }
        Ok(next)
    }
}

fn get(rules: &[Rule], index: usize) -> Result<&Rule, AutoresponderError> {
    rules.get(index).ok_or(AutoresponderError::RuleIndex {
        index,
        len: rules.len(),
    })
}

fn check_all(rules: &[Rule], indices: &[usize]) -> Result<(), AutoresponderError> {
    for &index in indices {
        get(rules, index)?;
    }
    Ok(())
}
