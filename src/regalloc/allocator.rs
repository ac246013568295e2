//! # Register Allocator
//!
//! Owns the value-to-register binding table and the value-to-value alias
//! table for one code-generation pass. Target knowledge enters only through
//! the [`TargetResolver`] the allocator owns.
//!
//! Guarantees:
//! - Allocation is idempotent per (alias-resolved) value: repeated requests
//!   return the same [`RegisterRef`] instance and never re-enter the resolver.
//! - Structures decompose depth-first in field declaration order.
//! - Freeing releases every hardware leaf exactly once; constants are never
//!   released.
//!
//! The allocator is not thread-safe. Build one per pass and hand it to the
//! stages that need it.

use std::collections::HashMap;
use std::rc::Rc;

use super::register::RegisterVariant;
use super::stats::{AliasSnapshot, AllocationStats, AllocatorSnapshot, BindingSnapshot};
use super::{
    AllocatorOptions, CompoundRegister, ConstantRegister, HardwareRegister, PrimitiveRef,
    RebindPolicy, Register, RegisterDescription, RegisterRef, TargetResolver,
};
use crate::ir::{PrimitiveValue, RegisterClass, TypeNode, Value, ValueId};
use crate::{Error, Result};

/// A live binding together with the value whose request created it
#[derive(Debug)]
struct RegisterEntry<K> {
    value: Value,
    register: RegisterRef<K>,
}

/// Generic register allocator over a target resolver
pub struct RegisterAllocator<R: TargetResolver> {
    resolver: R,
    options: AllocatorOptions,
    bindings: HashMap<ValueId, RegisterEntry<R::Kind>>,
    aliases: HashMap<ValueId, Value>,
    stats: AllocationStats,
}

impl<R: TargetResolver> RegisterAllocator<R> {
    /// Create an allocator with default options
    pub fn new(resolver: R) -> Self {
        Self::with_options(resolver, AllocatorOptions::default())
    }

    /// Create an allocator with custom options
    pub fn with_options(resolver: R, options: AllocatorOptions) -> Self {
        Self {
            resolver,
            options,
            bindings: HashMap::new(),
            aliases: HashMap::new(),
            stats: AllocationStats::default(),
        }
    }

    /// Options this allocator was built with
    pub fn options(&self) -> &AllocatorOptions {
        &self.options
    }

    /// The target resolver
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Mutable access to the target resolver
    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    /// Consume the allocator, returning its resolver
    pub fn into_resolver(self) -> R {
        self.resolver
    }

    // ------------------------------------------------------------------
    // Aliases
    // ------------------------------------------------------------------

    /// Follow the alias table from `value` to the value that owns bindings
    pub fn resolve_alias<'a>(&'a self, value: &'a Value) -> &'a Value {
        let mut current = value;
        // Terminates: `alias` never records a cycle.
        while let Some(target) = self.aliases.get(&current.id()) {
            current = target;
        }
        current
    }

    /// The stored alias target of `value`, if it is aliased
    pub fn alias_target(&self, value: &Value) -> Option<&Value> {
        self.aliases.get(&value.id())
    }

    /// Make `value` resolve through `target`
    ///
    /// If `target` is itself aliased, the stored alias skips that one hop.
    /// Aliases that already point at `value` are left untouched; lookups
    /// through them still reach the final target because resolution follows
    /// the whole chain. No registers are allocated or copied.
    ///
    /// A binding already held by `value` becomes unreachable, so it is removed
    /// and its registers are released. When it is the same register instance
    /// the new target resolves to, only the entry is dropped.
    pub fn alias(&mut self, value: &Value, target: &Value) -> Result<()> {
        let flattened = self
            .aliases
            .get(&target.id())
            .cloned()
            .unwrap_or_else(|| target.clone());

        // Every hop is checked: `value` may sit in the middle of the chain
        // when it is aliased already.
        let mut hop = &flattened;
        loop {
            if hop.id() == value.id() {
                return Err(Error::AliasCycle {
                    value: value.id().to_string(),
                    target: target.id().to_string(),
                });
            }
            match self.aliases.get(&hop.id()) {
                Some(next) => hop = next,
                None => break,
            }
        }

        let root = hop.id();
        let shadowed = self.bindings.remove(&value.id());

        tracing::trace!("alias {} -> {}", value.id(), flattened.id());
        self.aliases.insert(value.id(), flattened);
        if self.options.collect_stats {
            self.stats.aliases += 1;
        }

        match shadowed {
            Some(entry) => {
                let shared = self
                    .bindings
                    .get(&root)
                    .is_some_and(|live| Rc::ptr_eq(&live.register, &entry.register));
                tracing::debug!(
                    "alias of {} drops its binding {} (shared: {})",
                    value.id(),
                    entry.register,
                    shared
                );
                if shared {
                    Ok(())
                } else {
                    self.free_register(&entry.register)
                }
            }
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------

    /// Register bound to `value`, allocating it on first request
    ///
    /// Primitive, pointer, string and padding types receive one hardware
    /// register. Structures receive a compound register whose children are
    /// allocated recursively in field order.
    pub fn allocate(&mut self, value: &Value) -> Result<RegisterRef<R::Kind>> {
        let target = self.resolve_alias(value).clone();
        if let Some(entry) = self.bindings.get(&target.id()) {
            return Ok(entry.register.clone());
        }

        let register = self.allocate_type(target.ty())?;
        tracing::trace!("allocate {} -> {}", target, register);
        self.insert_binding(target.id(), value.clone(), register.clone());
        Ok(register)
    }

    /// Hardware register bound to `value`, allocating it on first request
    ///
    /// The value's type must be register-sized; no structure decomposition
    /// happens here.
    pub fn allocate_hardware(&mut self, value: &Value) -> Result<RegisterRef<R::Kind>> {
        let target = self.resolve_alias(value).clone();
        if let Some(entry) = self.bindings.get(&target.id()) {
            return match entry.register.as_ref() {
                Register::Hardware(_) => Ok(entry.register.clone()),
                other => Err(Error::UnexpectedRegister {
                    value: target.to_string(),
                    expected: <HardwareRegister<R::Kind> as RegisterVariant<R::Kind>>::NAME,
                    found: other.variant_name(),
                }),
            };
        }

        let description = self.resolver.resolve_register_description(target.ty())?;
        let register = self.allocate_hardware_register(description)?;
        tracing::trace!("allocate hardware {} -> {}", target, register);
        self.insert_binding(target.id(), value.clone(), register.clone());
        Ok(register)
    }

    /// Bind `value` to a constant register holding `constant`
    ///
    /// The description comes from the resolver, but no target register is
    /// allocated. An existing binding is returned unchanged.
    pub fn allocate_constant(
        &mut self,
        value: &Value,
        constant: PrimitiveValue,
    ) -> Result<RegisterRef<R::Kind>> {
        let target = self.resolve_alias(value).clone();
        if let Some(entry) = self.bindings.get(&target.id()) {
            return Ok(entry.register.clone());
        }

        let description = self.resolver.resolve_register_description(target.ty())?;
        if description.basic_value_type() != constant.basic_value_type() {
            return Err(Error::codegen(format!(
                "constant {} does not fit register of {} ({})",
                constant,
                target,
                description.basic_value_type()
            )));
        }

        let register: RegisterRef<R::Kind> =
            Rc::new(ConstantRegister::new(description, constant).into());
        tracing::trace!("constant {} -> {}", target, register);
        if self.options.collect_stats {
            self.stats.constants_bound += 1;
        }
        self.insert_binding(target.id(), value.clone(), register.clone());
        Ok(register)
    }

    /// Allocate an unbound register for a type
    ///
    /// Fails with [`Error::UnsupportedType`] for types that cannot live in
    /// registers. If a structure fails midway, the leaves allocated so far
    /// are released before the error is returned.
    pub fn allocate_type(&mut self, ty: &TypeNode) -> Result<RegisterRef<R::Kind>> {
        match ty.register_class()? {
            RegisterClass::Primitive(_) | RegisterClass::Pointer(_) | RegisterClass::String => {
                let description = self.resolver.resolve_register_description(ty)?;
                self.allocate_hardware_register(description)
            }
            RegisterClass::Padding(primitive) => {
                // Same register shape as the primitive, but keep the padding type.
                let resolved = self
                    .resolver
                    .resolve_register_description(&TypeNode::Primitive(primitive))?;
                let description = RegisterDescription::new(
                    ty.clone(),
                    resolved.basic_value_type(),
                    resolved.kind(),
                );
                self.allocate_hardware_register(description)
            }
            RegisterClass::Structure(structure) => {
                let mut children = Vec::with_capacity(structure.num_fields());
                for field in structure.fields() {
                    match self.allocate_type(field) {
                        Ok(child) => children.push(child),
                        Err(err) => {
                            self.release_partial(&children);
                            return Err(err);
                        }
                    }
                }
                let compound = CompoundRegister::new(structure.clone(), children)?;
                if self.options.collect_stats {
                    self.stats.compounds_built += 1;
                }
                Ok(Rc::new(compound.into()))
            }
        }
    }

    fn allocate_hardware_register(
        &mut self,
        description: RegisterDescription<R::Kind>,
    ) -> Result<RegisterRef<R::Kind>> {
        let register = self.resolver.allocate_register(description)?;
        if self.options.collect_stats {
            self.stats.hardware_allocated += 1;
        }
        Ok(Rc::new(register.into()))
    }

    fn release_partial(&mut self, registers: &[RegisterRef<R::Kind>]) {
        for register in registers {
            if let Err(err) = self.free_register(register) {
                tracing::warn!(
                    "failed to release partially allocated register {}: {}",
                    register,
                    err
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Binding
    // ------------------------------------------------------------------

    /// Bind `value` to a register chosen by the caller
    ///
    /// Any existing binding is replaced without releasing its registers; the
    /// resolver is not consulted. Registers shared between several bindings
    /// must only be freed through one of them.
    pub fn bind(&mut self, value: &Value, register: RegisterRef<R::Kind>) -> Result<()> {
        let target = self.resolve_alias(value).clone();
        if let Some(previous) = self.bindings.get(&target.id()) {
            if !Rc::ptr_eq(&previous.register, &register) {
                match self.options.rebind_policy {
                    RebindPolicy::Silent => {
                        tracing::debug!(
                            "rebinding {} from {} (produced by {}) to {}",
                            target.id(),
                            previous.register,
                            previous.value.id(),
                            register
                        );
                    }
                    RebindPolicy::Warn => {
                        if previous.register.num_hardware_leaves() > 0 {
                            tracing::warn!(
                                "rebinding {} drops live registers {} (produced by {})",
                                target.id(),
                                previous.register,
                                previous.value.id()
                            );
                        }
                    }
                    RebindPolicy::Deny => {
                        return Err(Error::codegen(format!(
                            "value {} is already bound to {} (produced by {})",
                            target.id(),
                            previous.register,
                            previous.value.id()
                        )));
                    }
                }
            }
        }

        tracing::trace!("bind {} -> {}", target, register);
        if self.options.collect_stats {
            self.stats.binds += 1;
        }
        self.insert_binding(target.id(), value.clone(), register);
        Ok(())
    }

    fn insert_binding(&mut self, id: ValueId, value: Value, register: RegisterRef<R::Kind>) {
        self.bindings.insert(id, RegisterEntry { value, register });
    }

    // ------------------------------------------------------------------
    // Loads
    // ------------------------------------------------------------------

    /// Whether `value` (after alias resolution) has a live binding
    pub fn is_bound(&self, value: &Value) -> bool {
        self.bindings.contains_key(&self.resolve_alias(value).id())
    }

    /// Register bound to `value`
    pub fn load(&self, value: &Value) -> Result<RegisterRef<R::Kind>> {
        self.entry(value).map(|entry| entry.register.clone())
    }

    /// Register bound to `value`, which must be of variant `T`
    pub fn load_as<T: RegisterVariant<R::Kind>>(&self, value: &Value) -> Result<&T> {
        let entry = self.entry(value)?;
        T::from_register(&entry.register).ok_or_else(|| Error::UnexpectedRegister {
            value: self.resolve_alias(value).to_string(),
            expected: T::NAME,
            found: entry.register.variant_name(),
        })
    }

    /// Primitive (constant or hardware) register bound to `value`
    pub fn load_primitive(&self, value: &Value) -> Result<PrimitiveRef<'_, R::Kind>> {
        let entry = self.entry(value)?;
        entry
            .register
            .as_primitive()
            .ok_or_else(|| Error::UnexpectedRegister {
                value: self.resolve_alias(value).to_string(),
                expected: "primitive",
                found: entry.register.variant_name(),
            })
    }

    /// Hardware register bound to `value`
    pub fn load_hardware(&self, value: &Value) -> Result<&HardwareRegister<R::Kind>> {
        self.load_as::<HardwareRegister<R::Kind>>(value)
    }

    fn entry(&self, value: &Value) -> Result<&RegisterEntry<R::Kind>> {
        let target = self.resolve_alias(value);
        self.bindings
            .get(&target.id())
            .ok_or_else(|| Error::MissingBinding {
                value: target.to_string(),
            })
    }

    // ------------------------------------------------------------------
    // Freeing
    // ------------------------------------------------------------------

    /// Remove the binding of `value` and release its registers
    pub fn free(&mut self, value: &Value) -> Result<()> {
        let target = self.resolve_alias(value).id();
        let entry = self
            .bindings
            .remove(&target)
            .ok_or_else(|| Error::MissingBinding {
                value: value.to_string(),
            })?;
        tracing::trace!("free {} ({})", target, entry.register);
        self.free_register(&entry.register)
    }

    /// Release the target registers held by `register`
    ///
    /// Hardware registers go back to the resolver and constants need nothing.
    /// Compound registers free every child in order; a failing child does not
    /// stop the rest, and the first error is returned.
    pub fn free_register(&mut self, register: &Register<R::Kind>) -> Result<()> {
        match register {
            Register::Constant(_) => Ok(()),
            Register::Hardware(hardware) => {
                self.resolver.free_register(hardware)?;
                if self.options.collect_stats {
                    self.stats.hardware_freed += 1;
                }
                Ok(())
            }
            Register::Compound(compound) => {
                // Keep going after a failed child so no sibling leaks.
                let mut first_error = None;
                for (index, child) in compound.children().iter().enumerate() {
                    if let Err(err) = self.free_register(child) {
                        tracing::warn!("failed to free child {} of {}: {}", index, register, err);
                        first_error.get_or_insert(err);
                    }
                }
                match first_error {
                    Some(err) => Err(err),
                    None => Ok(()),
                }
            }
        }
    }

    /// Free every live binding and forget all aliases
    ///
    /// Bindings are released in value order. Every binding is attempted; the
    /// first error is returned.
    pub fn reset(&mut self) -> Result<()> {
        let mut entries: Vec<_> = self.bindings.drain().collect();
        entries.sort_by_key(|(id, _)| *id);
        self.aliases.clear();

        let mut first_error = None;
        for (id, entry) in entries {
            if let Err(err) = self.free_register(&entry.register) {
                tracing::warn!("failed to free {} during reset: {}", id, err);
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Number of live bindings
    pub fn num_bindings(&self) -> usize {
        self.bindings.len()
    }

    /// Allocation counters
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    /// Snapshot of bindings, aliases and counters, sorted by value id
    pub fn snapshot(&self) -> AllocatorSnapshot {
        let mut bindings: Vec<_> = self.bindings.iter().collect();
        bindings.sort_by_key(|(id, _)| **id);
        let mut aliases: Vec<_> = self.aliases.iter().collect();
        aliases.sort_by_key(|(id, _)| **id);

        AllocatorSnapshot {
            bindings: bindings
                .into_iter()
                .map(|(id, entry)| BindingSnapshot {
                    value: id.to_string(),
                    ty: entry.register.ty().to_string(),
                    register: entry.register.to_string(),
                    produced_by: entry.value.id().to_string(),
                })
                .collect(),
            aliases: aliases
                .into_iter()
                .map(|(id, target)| AliasSnapshot {
                    value: id.to_string(),
                    target: target.id().to_string(),
                })
                .collect(),
            stats: self.stats,
        }
    }

    /// Snapshot rendered as pretty JSON
    pub fn dump_bindings(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}
