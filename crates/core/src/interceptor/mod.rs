// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2026 Tablelog

//! Hooks run by the transaction coordinator after a table transaction commits.

use std::sync::Arc;

use tablelog_type::{Result, TableId, UserId, Version};

/// What a committed table transaction produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePostCommitContext {
	pub table: TableId,
	pub user: UserId,
	/// Versions appended by the transaction, in order.
	pub versions: Vec<Version>,
}

impl TablePostCommitContext {
	pub fn new(table: TableId, user: UserId, versions: Vec<Version>) -> Self {
		Self {
			table,
			user,
			versions,
		}
	}

	pub fn last_version(&self) -> Option<Version> {
		self.versions.last().copied()
	}
}

pub trait TablePostCommitInterceptor: Send + Sync {
	fn intercept(&self, ctx: &TablePostCommitContext) -> Result<()>;
}

/// Ordered list of interceptors sharing one hook point.
pub struct InterceptorChain<I: ?Sized> {
	pub interceptors: Vec<Arc<I>>,
}

impl<I: ?Sized> Default for InterceptorChain<I> {
	fn default() -> Self {
		Self::new()
	}
}

impl<I: ?Sized> Clone for InterceptorChain<I> {
	fn clone(&self) -> Self {
		Self {
			interceptors: self.interceptors.clone(),
		}
	}
}

impl<I: ?Sized> InterceptorChain<I> {
	pub fn new() -> Self {
		Self {
			interceptors: Vec::new(),
		}
	}

	pub fn add(&mut self, interceptor: Arc<I>) {
		self.interceptors.push(interceptor);
	}

	pub fn is_empty(&self) -> bool {
		self.interceptors.is_empty()
	}

	pub fn len(&self) -> usize {
		self.interceptors.len()
	}
}

impl InterceptorChain<dyn TablePostCommitInterceptor> {
	/// Runs every interceptor in order, stopping at the first failure.
	pub fn execute(&self, ctx: &TablePostCommitContext) -> Result<()> {
		for interceptor in &self.interceptors {
			interceptor.intercept(ctx)?;
		}
		Ok(())
	}
}
