//! Replays a recorded trace of `<time> <value>` lines as DEVS output, with
//! no input of its own. Grounded in the original C++ library's
//! `basic_models::event_stream`, generalized from its hard-coded stream
//! parser to a caller-supplied [`FromStr`] pair and returning
//! [`ParseError`] instead of throwing, since a malformed trace is exactly
//! the kind of externally-sourced data error this crate's error taxonomy
//! reserves [`CompositionError`]'s sibling for.

use crate::error::ParseError;
use crate::modeling::{Atomic, Component, Output, Port};
use crate::time::{SimTime, Ticks};
use std::cell::RefCell;
use std::fmt::Debug;
use std::str::FromStr;

/// One parsed `(time, value)` record from a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T, M> {
    pub time: T,
    pub value: M,
}

fn parse_line<T, M>(line: &str) -> Result<Record<T, M>, ParseError>
where
    T: FromStr,
    M: FromStr,
{
    let mut fields = line.split_whitespace();
    let time = fields
        .next()
        .ok_or_else(|| ParseError {
            line: line.to_string(),
            reason: "missing time field".to_string(),
        })
        .and_then(|s| {
            s.parse::<T>().map_err(|_| ParseError {
                line: line.to_string(),
                reason: "time field is not parseable".to_string(),
            })
        })?;
    let value = fields
        .next()
        .ok_or_else(|| ParseError {
            line: line.to_string(),
            reason: "missing value field".to_string(),
        })
        .and_then(|s| {
            s.parse::<M>().map_err(|_| ParseError {
                line: line.to_string(),
                reason: "value field is not parseable".to_string(),
            })
        })?;
    if fields.next().is_some() {
        return Err(ParseError {
            line: line.to_string(),
            reason: "trailing fields after time and value".to_string(),
        });
    }
    Ok(Record { time, value })
}

/// Parses a whole trace (one `<time> <value>` record per line, blank
/// lines skipped) up front. Each record's `time` is absolute; this is
/// converted to per-step advances when the model runs.
pub fn parse_trace<M: FromStr>(text: &str) -> Result<Vec<Record<Ticks, M>>, ParseError> {
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(parse_line::<u64, M>)
        .map(|r| r.map(|Record { time, value }| Record { time: Ticks::new(time), value }))
        .collect()
}

/// Replays a pre-parsed trace. Has no input port: like the generator, an
/// external or confluent call on this model is a contract violation.
#[derive(Debug)]
pub struct EventStream<T: SimTime, M> {
    component: Component<T>,
    out: Port<Output, M>,
    records: RefCell<std::vec::IntoIter<Record<T, M>>>,
    pending: RefCell<Option<Record<T, M>>>,
    last: T,
}

impl<T: SimTime, M: 'static + Clone + Debug> EventStream<T, M> {
    /// Builds a stream from records with absolute times, starting at
    /// `init`. Records must be sorted by time and all lie at or after
    /// `init`, mirroring the original's requirement that the input have
    /// "absolute times greater than init time".
    pub fn new(name: &str, init: T, records: Vec<Record<T, M>>) -> Self {
        let mut component = Component::new(name);
        let out = component.add_out_port::<M>("out");
        let mut iter = records.into_iter();
        let pending = iter.next();
        Self {
            component,
            out,
            records: RefCell::new(iter),
            pending: RefCell::new(pending),
            last: init,
        }
    }

    fn next_time(&self) -> T {
        self.pending
            .borrow()
            .as_ref()
            .map(|r| r.time)
            .unwrap_or(T::INFINITY)
    }
}

impl<T: SimTime, M: 'static + Clone + Debug> Atomic<T> for EventStream<T, M> {
    fn component(&self) -> &Component<T> {
        &self.component
    }

    fn component_mut(&mut self) -> &mut Component<T> {
        &mut self.component
    }

    fn output(&self) {
        if let Some(record) = self.pending.borrow().as_ref() {
            self.out.add_value(record.value.clone());
        }
    }

    fn internal(&mut self) {
        self.last = self.next_time();
        let next = self.records.get_mut().next();
        *self.pending.get_mut() = next;
    }

    fn external(&mut self, _e: T) {
        unreachable!("event stream has no input port, so it can never receive external input");
    }

    fn advance(&self) -> T {
        let next = self.next_time();
        if next == T::INFINITY {
            T::INFINITY
        } else {
            next - self.last
        }
    }
}
