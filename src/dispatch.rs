//! Maps a case's operation kind onto a single processor call.

use crate::equivalence::Actual;
use crate::errors::{FixtureError, ProcessorError};
use crate::fixture::LoadedCase;
use crate::manifest::{OperationKind, TestCase};
use crate::processor::Processor;
use crate::triples::encode_line;

/// What happened when a case was handed to the processor.
#[derive(Debug)]
pub enum Dispatched {
    /// The processor produced an output.
    Output(Actual),
    /// The case's `type` is not one of the known operations; nothing was called.
    Unrecognized(String),
}

/// Why a dispatch produced no output.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DispatchError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Processor(#[from] ProcessorError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fixture(#[from] FixtureError),
}

/// Invokes exactly one processor operation for `case`.
///
/// Compact and frame cases need the context / frame document that
/// [`LoadedCase::load`] reads for them.
pub fn dispatch<P>(processor: &P, case: &TestCase, loaded: &LoadedCase) -> Result<Dispatched, DispatchError>
where
    P: Processor + ?Sized,
{
    let input = &loaded.input;
    let output = match &case.operation {
        OperationKind::Normalize => Actual::Document(processor.normalize(input)?),
        OperationKind::Expand => Actual::Document(processor.expand(input)?),
        OperationKind::Compact => {
            let context = loaded
                .context
                .as_ref()
                .ok_or_else(|| missing(case, "context"))?;
            Actual::Document(processor.compact(context, input)?)
        }
        OperationKind::Frame => {
            let frame = loaded.frame.as_ref().ok_or_else(|| missing(case, "frame"))?;
            Actual::Document(processor.frame(input, frame)?)
        }
        OperationKind::Triples => {
            let mut lines = Vec::new();
            processor.triples(input, &mut |subject, predicate, object| {
                lines.push(encode_line(subject, predicate, object));
            })?;
            Actual::Statements(lines.join("\n"))
        }
        OperationKind::Unrecognized(name) => return Ok(Dispatched::Unrecognized(name.clone())),
    };
    Ok(Dispatched::Output(output))
}

fn missing(case: &TestCase, field: &'static str) -> FixtureError {
    FixtureError::MissingReference {
        test: case.name.clone(),
        operation: case.operation.to_string(),
        field,
    }
}
