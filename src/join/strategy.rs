// SPDX-License-Identifier: Apache-2.0

//! Closed set of join strategies.
//!
//! Callers pick a strategy explicitly, either by constructing one of the
//! concrete types or through [`JoinKind::strategy`].

use std::fmt;
use std::str::FromStr;

use fedjoin_core::{Job, SessionId};
use serde::{Deserialize, Serialize};

use crate::config::JoinParams;
use crate::error::{JoinError, JoinResult};
use crate::join::full_outer::FullOuterJoin;
use crate::join::inner::InnerHashJoin;
use crate::join::left_outer::LeftOuterJoin;
use crate::join::request::JoinRequest;
use crate::join::traits::JoinImplementation;
use crate::join::union::UnionJoin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    LeftOuter,
    FullOuter,
    Union,
}

impl JoinKind {
    pub const ALL: [JoinKind; 4] = [
        JoinKind::Inner,
        JoinKind::LeftOuter,
        JoinKind::FullOuter,
        JoinKind::Union,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "inner",
            Self::LeftOuter => "left_outer",
            Self::FullOuter => "full_outer",
            Self::Union => "union",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Inner => 0,
            Self::LeftOuter => 1,
            Self::FullOuter => 2,
            Self::Union => 3,
        }
    }

    /// Whether the strategy matches rows on key columns.
    pub fn uses_key_columns(&self) -> bool {
        !matches!(self, Self::Union)
    }

    /// Builds a strategy with default settings.
    pub fn strategy(self) -> JoinStrategy {
        match self {
            Self::Inner => JoinStrategy::Inner(InnerHashJoin::new()),
            Self::LeftOuter => JoinStrategy::LeftOuter(LeftOuterJoin::new()),
            Self::FullOuter => JoinStrategy::FullOuter(FullOuterJoin::new()),
            Self::Union => JoinStrategy::Union(UnionJoin::new()),
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "inner" | "inner_hash" => Ok(Self::Inner),
            "left_outer" | "left" => Ok(Self::LeftOuter),
            "full_outer" | "full" => Ok(Self::FullOuter),
            "union" => Ok(Self::Union),
            _ => Err(format!("Unknown join kind: {s}")),
        }
    }
}

/// One of the four strategies, dispatched statically.
#[derive(Debug, Clone)]
pub enum JoinStrategy {
    Inner(InnerHashJoin),
    LeftOuter(LeftOuterJoin),
    FullOuter(FullOuterJoin),
    Union(UnionJoin),
}

impl JoinStrategy {
    fn as_impl(&self) -> &dyn JoinImplementation {
        match self {
            Self::Inner(s) => s,
            Self::LeftOuter(s) => s,
            Self::FullOuter(s) => s,
            Self::Union(s) => s,
        }
    }

    fn as_impl_mut(&mut self) -> &mut dyn JoinImplementation {
        match self {
            Self::Inner(s) => s,
            Self::LeftOuter(s) => s,
            Self::FullOuter(s) => s,
            Self::Union(s) => s,
        }
    }
}

impl JoinImplementation for JoinStrategy {
    fn kind(&self) -> JoinKind {
        self.as_impl().kind()
    }

    fn setup(&mut self, params: &JoinParams) -> Result<(), JoinError> {
        self.as_impl_mut().setup(params)
    }

    fn run<'j>(
        &self,
        session: &SessionId,
        request: &JoinRequest<'_>,
        job: &'j mut Job,
    ) -> JoinResult<&'j mut Job> {
        self.as_impl().run(session, request, job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedjoin_core::ResultShape;

    #[test]
    fn kinds_round_trip_through_strings() {
        for kind in JoinKind::ALL {
            assert_eq!(kind.as_str().parse::<JoinKind>(), Ok(kind));
            assert_eq!(kind.strategy().kind(), kind);
        }
        assert_eq!("Full-Outer".parse::<JoinKind>(), Ok(JoinKind::FullOuter));
        assert!("cross".parse::<JoinKind>().is_err());
    }

    #[test]
    fn kind_indices_are_distinct() {
        let mut seen: Vec<usize> = JoinKind::ALL.iter().map(JoinKind::index).collect();
        seen.dedup();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn every_strategy_is_tabular() {
        for kind in JoinKind::ALL {
            assert_eq!(kind.strategy().declared_result_shape(), ResultShape::Tabular);
        }
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&JoinKind::LeftOuter).unwrap();
        assert_eq!(json, "\"left_outer\"");
    }
}
