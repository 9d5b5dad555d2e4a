//! Model Builder: one [`ClassNode`] of a [`TranslationUnit`] into an
//! [`InterfaceDecl`].
//!
//! Members are visited in source order. Methods of the single mockable
//! base (if any) are inherited first, template arguments substituted,
//! followed by the class's own declarations.

use std::collections::{HashMap, HashSet};

use mw_core::{
    Access, BaseRef, CtorDecl, CtorSignature, DispatchKey, InterfaceDecl, MethodDecl, TypeAlias,
    TypeRef, Virtuality, mangle,
};
use mw_parser::{BaseSpecifier, ClassNode, MemberNode, MethodNode, TranslationUnit};

use crate::error::MockError;
use crate::slots::SlotPredicate;

/// Builds interface models for the classes of one translation unit.
pub struct ModelBuilder<'a> {
    unit: &'a TranslationUnit,
    slots: &'a dyn SlotPredicate,
    access: &'a [Access],
}

/// Methods of one class with everything it inherits.
struct Collected {
    methods: Vec<MethodDecl>,
    /// `(name, key)` of every pure virtual seen along the base chain,
    /// overridden or not. Overriders of these are mocked regardless of access.
    abstract_keys: HashSet<(String, DispatchKey)>,
}

impl<'a> ModelBuilder<'a> {
    #[must_use]
    pub fn new(unit: &'a TranslationUnit, slots: &'a dyn SlotPredicate, access: &'a [Access]) -> Self {
        Self {
            unit,
            slots,
            access,
        }
    }

    /// Build the interface model of `class`.
    ///
    /// # Errors
    /// `UnsupportedConstruct` for more than one mockable base, an overloaded
    /// mockable operator, a virtual conversion operator, no usable
    /// constructor, or no mockable member at all.
    pub fn build(&self, class: &ClassNode) -> Result<InterfaceDecl, MockError> {
        let interface = class.qualified_name.as_str();
        let mut visited = HashSet::new();
        let collected = self.collect_methods(class, interface, &mut visited)?;
        let methods = self.filter_access(interface, collected);

        check_operators(interface, &methods)?;
        if !methods.iter().any(MethodDecl::is_mockable) {
            return Err(MockError::unsupported(
                interface,
                &class.name,
                "no mockable members (no virtual method or slot, and no mockable base)",
            ));
        }
        let ctors = capture_ctors(class)?;

        tracing::debug!(
            interface,
            methods = methods.len(),
            ctors = ctors.len(),
            "built interface model"
        );

        Ok(InterfaceDecl {
            name: class.name.clone(),
            qualified_name: class.qualified_name.clone(),
            namespace: class.namespace_path(),
            template_params: class.template_params.clone(),
            base_classes: class.bases.iter().map(base_ref).collect(),
            methods,
            ctors,
            type_aliases: class
                .aliases()
                .map(|alias| TypeAlias {
                    name: alias.name.clone(),
                    target: alias.target.clone(),
                    template_params: alias.template_params.clone(),
                })
                .collect(),
            is_qobject: class.is_qobject,
            header: self.unit.path.clone(),
        })
    }

    /// Whether `class` (or one of its bases in this unit) declares anything
    /// mockable. Classes for which this is false cannot be built.
    #[must_use]
    pub fn is_candidate(&self, class: &ClassNode) -> bool {
        self.has_eligible_members(class, &mut HashSet::new())
    }

    fn has_eligible_members(&self, class: &ClassNode, visited: &mut HashSet<String>) -> bool {
        if !visited.insert(class.qualified_name.clone()) {
            return false;
        }
        if class.methods().any(|m| self.is_eligible(m)) {
            return true;
        }
        class
            .bases
            .iter()
            .filter_map(|base| base.resolved.as_deref().and_then(|q| self.unit.get(q)))
            .any(|base| self.has_eligible_members(base, visited))
    }

    fn is_eligible(&self, method: &MethodNode) -> bool {
        if method.is_static || method.is_template || method.is_deleted {
            return false;
        }
        method.is_virtual
            || method.is_pure
            || method.is_override
            || method.is_final
            || self.slots.is_slot(method)
    }

    /// The single base of `class` that has mockable members.
    fn mockable_base<'c>(
        &self,
        class: &'c ClassNode,
        interface: &str,
    ) -> Result<Option<(&'c BaseSpecifier, &'a ClassNode)>, MockError> {
        let unit = self.unit;
        let bases: Vec<(&BaseSpecifier, &ClassNode)> = class
            .bases
            .iter()
            .filter_map(|spec| {
                let base = unit.get(spec.resolved.as_deref()?)?;
                self.has_eligible_members(base, &mut HashSet::new())
                    .then_some((spec, base))
            })
            .collect();
        match bases.as_slice() {
            [] => Ok(None),
            [single] => Ok(Some(*single)),
            many => {
                let names: Vec<&str> = many.iter().map(|(spec, _)| spec.spelling.as_str()).collect();
                Err(MockError::unsupported(
                    interface,
                    &class.qualified_name,
                    format!("more than one mockable base ({})", names.join(", ")),
                ))
            }
        }
    }

    fn collect_methods(
        &self,
        class: &ClassNode,
        interface: &str,
        visited: &mut HashSet<String>,
    ) -> Result<Collected, MockError> {
        if !visited.insert(class.qualified_name.clone()) {
            return Err(MockError::unsupported(
                interface,
                &class.qualified_name,
                "cyclic inheritance",
            ));
        }

        let mut inherited = Collected {
            methods: Vec::new(),
            abstract_keys: HashSet::new(),
        };
        if let Some((spec, base)) = self.mockable_base(class, interface)? {
            inherited = self.collect_methods(base, interface, visited)?;
            let bindings = template_bindings(base, spec);
            if !bindings.is_empty() {
                for method in &mut inherited.methods {
                    substitute(method, &bindings);
                }
                inherited.abstract_keys = inherited
                    .abstract_keys
                    .into_iter()
                    .map(|(name, key)| {
                        let params = key.params.iter().map(|p| p.substitute(&bindings)).collect();
                        (name, DispatchKey::new(params, key.qualifiers))
                    })
                    .collect();
            }
        }

        let own = class
            .methods()
            .filter(|node| !node.is_deleted)
            .map(|node| self.method_decl(class, node, &inherited.methods, interface))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(merge(class, inherited, own))
    }

    fn method_decl(
        &self,
        class: &ClassNode,
        node: &MethodNode,
        inherited: &[MethodDecl],
        interface: &str,
    ) -> Result<MethodDecl, MockError> {
        let key = DispatchKey::new(node.params.clone(), node.qualifiers);
        let overrides_virtual = || {
            inherited.iter().any(|m| {
                m.name == node.name && m.virtuality.is_virtual() && DispatchKey::of(m) == key
            })
        };
        let virtuality = if node.is_pure {
            Virtuality::PureVirtual
        } else if node.is_virtual || node.is_override || node.is_final || overrides_virtual() {
            Virtuality::Virtual
        } else {
            Virtuality::NonVirtual
        };

        let method = MethodDecl {
            name: node.name.clone(),
            return_type: node.return_type.clone(),
            params: node.params.clone(),
            qualifiers: node.qualifiers,
            virtuality,
            declaring_class: class.qualified_name.clone(),
            access: node.access,
            is_slot: self.slots.is_slot(node),
            is_static: node.is_static,
            is_template: node.is_template,
            is_noexcept: node.is_noexcept,
            is_operator: mangle::is_operator_name(&node.name),
            line: node.line,
        };
        if node.is_conversion && method.is_mockable() {
            return Err(MockError::unsupported(
                interface,
                method.signature(),
                "conversion operators cannot be mocked",
            ));
        }
        Ok(method)
    }

    /// Drop mockable methods whose access is not requested. Pure virtuals
    /// and their overriders always stay.
    fn filter_access(&self, interface: &str, collected: Collected) -> Vec<MethodDecl> {
        let Collected {
            methods,
            abstract_keys,
        } = collected;
        methods
            .into_iter()
            .filter(|method| {
                if !method.is_mockable()
                    || method.is_pure_virtual()
                    || self.access.contains(&method.access)
                    || abstract_keys.contains(&(method.name.clone(), DispatchKey::of(method)))
                {
                    return true;
                }
                tracing::debug!(
                    interface,
                    method = %method.signature(),
                    access = %method.access,
                    "excluded by access filter"
                );
                false
            })
            .collect()
    }
}

/// Inherited methods not overridden or hidden, then the class's own.
fn merge(class: &ClassNode, inherited: Collected, own: Vec<MethodDecl>) -> Collected {
    let using: HashSet<&str> = class.using_names().collect();
    let mut abstract_keys = inherited.abstract_keys;
    let mut methods = Vec::with_capacity(inherited.methods.len() + own.len());

    for base_method in inherited.methods {
        let key = DispatchKey::of(&base_method);
        if base_method.is_pure_virtual() {
            abstract_keys.insert((base_method.name.clone(), key.clone()));
        }
        let overridden = own
            .iter()
            .any(|m| m.name == base_method.name && DispatchKey::of(m) == key);
        if overridden {
            continue;
        }
        let hidden = own.iter().any(|m| m.name == base_method.name);
        if hidden && !base_method.is_pure_virtual() && !using.contains(base_method.name.as_str()) {
            tracing::warn!(
                class = %class.qualified_name,
                method = %base_method.signature(),
                base = %base_method.declaring_class,
                "base method hidden by a declaration of the same name; not mocked"
            );
            continue;
        }
        methods.push(base_method);
    }
    for method in &own {
        if method.is_pure_virtual() {
            abstract_keys.insert((method.name.clone(), DispatchKey::of(method)));
        }
    }
    methods.extend(own);

    Collected {
        methods,
        abstract_keys,
    }
}

/// At most one mockable overload per operator.
fn check_operators(interface: &str, methods: &[MethodDecl]) -> Result<(), MockError> {
    let mut seen: HashMap<&str, &MethodDecl> = HashMap::new();
    for method in methods.iter().filter(|m| m.is_operator && m.is_mockable()) {
        if let Some(first) = seen.insert(method.name.as_str(), method) {
            return Err(MockError::unsupported(
                interface,
                method.signature(),
                format!(
                    "overloaded mockable operator (also declared as `{}`)",
                    first.signature()
                ),
            ));
        }
    }
    Ok(())
}

/// Constructors usable by a derived mock.
///
/// Deleted and private constructors are skipped; template and inheriting
/// constructors only allow variadic forwarding. No declared constructor
/// means the implicit default one, which forwarding also covers.
fn capture_ctors(class: &ClassNode) -> Result<Vec<CtorDecl>, MockError> {
    fn push_forwarding(ctors: &mut Vec<CtorDecl>) {
        if !ctors.contains(&CtorDecl::ForwardingVariadic) {
            ctors.push(CtorDecl::ForwardingVariadic);
        }
    }

    let mut ctors = Vec::new();
    let mut declared = 0usize;

    for member in &class.members {
        match member {
            MemberNode::Ctor(ctor) => {
                declared += 1;
                if ctor.is_deleted {
                    continue;
                }
                if ctor.is_template {
                    push_forwarding(&mut ctors);
                } else if ctor.access == Access::Private {
                    tracing::debug!(class = %class.qualified_name, line = ctor.line, "skipping private constructor");
                } else {
                    ctors.push(CtorDecl::Signature(CtorSignature {
                        params: ctor.params.clone(),
                        access: ctor.access,
                        is_explicit: ctor.is_explicit,
                    }));
                }
            }
            MemberNode::InheritingCtor { .. } => push_forwarding(&mut ctors),
            _ => {}
        }
    }

    if declared > 0 && ctors.is_empty() {
        return Err(MockError::unsupported(
            &class.qualified_name,
            &class.name,
            "every declared constructor is deleted or private",
        ));
    }
    Ok(ctors)
}

fn base_ref(spec: &BaseSpecifier) -> BaseRef {
    BaseRef {
        spelling: spec.spelling.clone(),
        qualified_name: spec.resolved.clone(),
        access: spec.access,
        is_virtual: spec.is_virtual,
    }
}

/// Template parameter name → argument, for `class D : Base<int, Ts...>`.
fn template_bindings(base: &ClassNode, spec: &BaseSpecifier) -> HashMap<String, String> {
    let mut bindings = HashMap::new();
    for (index, param) in base.template_params.iter().enumerate() {
        if param.kind == mw_core::TemplateParamKind::Pack {
            // Only a pack forwarded as a single pack expansion can be renamed.
            let rest = spec.template_args.get(index..).unwrap_or_default();
            if let [single] = rest
                && let Some(inner) = single.strip_suffix("...")
            {
                bindings.insert(param.name.clone(), inner.trim().to_string());
            }
            break;
        }
        if let Some(arg) = spec.template_args.get(index)
            && arg != &param.name
        {
            bindings.insert(param.name.clone(), arg.clone());
        }
    }
    bindings
}

fn substitute(method: &mut MethodDecl, bindings: &HashMap<String, String>) {
    method.return_type = method.return_type.substitute(bindings);
    method.params = method.params.iter().map(|p| p.substitute(bindings)).collect::<Vec<TypeRef>>();
}
