//! One-pass scan over a codebase: discover files, crosswalk every
//! eligible method once, and fold the verdicts into a ranked report.

use crate::convert::{self, doc_signature_from_tags};
use crate::core::{
    DocTag, MethodIdentity, MethodSignature, Mismatch, VerifiedMethod, Visibility,
};
use crate::crosswalk::crosswalk;
use crate::equivalence::CheckPolicy;
use crate::extract::{DocExtractor, FileDiscovery, SignatureSource};
use anyhow::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Accumulated run state. Created when a scan starts, consumed into the
/// report when it ends; grows monotonically in between.
#[derive(Debug, Default)]
pub struct RunState {
    total: HashSet<MethodIdentity>,
    failed: HashSet<MethodIdentity>,
    failed_by_file: Vec<(PathBuf, Vec<MethodIdentity>)>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if this identity was already visited
    pub fn seen(&self, identity: &MethodIdentity) -> bool {
        self.total.contains(identity)
    }

    /// Fold one verdict in. The identity is marked visited; failures
    /// are tallied under their file in first-encounter order.
    pub fn record(&mut self, verified: &VerifiedMethod) {
        self.total.insert(verified.identity.clone());
        if verified.passed() {
            return;
        }
        self.failed.insert(verified.identity.clone());
        let file = &verified.identity.file;
        if let Some((_, identities)) = self.failed_by_file.iter_mut().find(|(f, _)| f == file) {
            identities.push(verified.identity.clone());
        } else {
            self.failed_by_file
                .push((file.clone(), vec![verified.identity.clone()]));
        }
    }

    /// Consume into the final report body. Files are ranked by failure
    /// count descending; ties keep first-encounter order.
    fn into_report(self, findings: Vec<Finding>) -> Report {
        let mut files: Vec<FileTally> = self
            .failed_by_file
            .into_iter()
            .map(|(file, identities)| FileTally {
                count: identities.len(),
                file,
            })
            .collect();
        files.sort_by_key(|tally| std::cmp::Reverse(tally.count));
        Report {
            total: self.total.len(),
            failed: self.failed.len(),
            failures_by_file: files,
            findings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTally {
    pub file: PathBuf,
    pub count: usize,
}

/// Declared signature rendered into the documentation tag grammar, for
/// the report's diff blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedSignature {
    pub params: Vec<(String, String)>,
    pub returns: Option<String>,
}

impl RenderedSignature {
    fn from_signature(signature: &MethodSignature) -> Self {
        Self {
            params: signature
                .params
                .iter()
                .map(|(name, expr)| (name.to_string(), convert::render(expr)))
                .collect(),
            returns: signature.returns.as_ref().map(convert::render),
        }
    }
}

/// One failing method with everything the report needs to print
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub identity: MethodIdentity,
    pub mismatches: Vec<Mismatch>,
    pub documented_tags: Vec<DocTag>,
    pub declared: Option<RenderedSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub total: usize,
    pub failed: usize,
    pub failures_by_file: Vec<FileTally>,
    pub findings: Vec<Finding>,
}

/// Pure orchestration over the collaborators; performs no type
/// comparison itself
pub struct Scanner<D, E, S> {
    discovery: D,
    docs: E,
    signatures: S,
    policy: CheckPolicy,
}

impl<D, E, S> Scanner<D, E, S>
where
    D: FileDiscovery,
    E: DocExtractor,
    S: SignatureSource,
{
    pub fn new(discovery: D, docs: E, signatures: S, policy: CheckPolicy) -> Self {
        Self {
            discovery,
            docs,
            signatures,
            policy,
        }
    }

    pub fn scan(&self, root: &Path) -> Result<Report> {
        // discovery failure is the only fatal condition
        let files = self.discovery.discover(root)?;
        info!("scanning {} files under {}", files.len(), root.display());

        let mut state = RunState::new();
        let mut findings = Vec::new();

        for file in &files {
            let docs = match self.docs.extract(file) {
                Ok(docs) => docs,
                Err(err) => {
                    warn!("skipping {}: {err}", file.display());
                    continue;
                }
            };

            for doc in docs {
                if doc.visibility == Visibility::Private {
                    continue;
                }
                let identity = MethodIdentity {
                    namespace: doc.namespace.clone(),
                    name: doc.name.clone(),
                    file: doc.file.clone(),
                    line: doc.line,
                };
                if state.seen(&identity) {
                    continue;
                }

                // introspection failure degrades to "no declared signature"
                let declared: Option<MethodSignature> =
                    match self.signatures.signature_for(&doc) {
                        Ok(signature) => Some(signature),
                        Err(err) => {
                            debug!("{}: {err}", identity.title());
                            None
                        }
                    };

                let documented = doc_signature_from_tags(&doc.tags);
                let verified =
                    crosswalk(identity, declared.as_ref(), &documented, &self.policy);
                state.record(&verified);

                if !verified.passed() {
                    findings.push(Finding {
                        identity: verified.identity,
                        mismatches: verified.mismatches,
                        documented_tags: doc.tags,
                        declared: declared.as_ref().map(RenderedSignature::from_signature),
                    });
                }
            }
        }

        Ok(state.into_report(findings))
    }
}
