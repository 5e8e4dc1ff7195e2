//! Recursive step chain type.

use serde::{Deserialize, Serialize};

use super::service::DeployStep;
use super::stages::NextStage;

/// Terminal marker for the end of a step chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct End;

/// A step node in the deployment sequence.
///
/// `S` is the step to run, `Next` is the rest of the chain.
/// The chain encodes deployment order through the type system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "S: DeployStep, Next: Serialize + serde::de::DeserializeOwned")]
pub struct Sequence<S, Next = End>
where
    S: DeployStep,
{
    /// The step configuration for this stage.
    pub step: S,
    /// The rest of the sequence.
    pub next: Next,
}

impl<S> Sequence<S, End>
where
    S: DeployStep,
{
    /// Create a new sequence with a single step.
    pub fn new(step: S) -> Self {
        Self { step, next: End }
    }

    /// Chain another step after this one.
    ///
    /// The next step must belong to the stage directly after this one.
    pub fn then<S2>(self, step: S2) -> Sequence<S, Sequence<S2, End>>
    where
        S2: DeployStep,
        S::Stage: NextStage<Next = S2::Stage>,
    {
        Sequence {
            step: self.step,
            next: Sequence::new(step),
        }
    }
}

// Implement then() on Sequence<S, Sequence<S2, End>> - for 2-step chains
impl<S, S2> Sequence<S, Sequence<S2, End>>
where
    S: DeployStep,
    S2: DeployStep,
{
    /// Chain another step after this one.
    pub fn then<S3>(self, step: S3) -> Sequence<S, Sequence<S2, Sequence<S3, End>>>
    where
        S3: DeployStep,
        S2::Stage: NextStage<Next = S3::Stage>,
    {
        Sequence {
            step: self.step,
            next: Sequence {
                step: self.next.step,
                next: Sequence::new(step),
            },
        }
    }
}
