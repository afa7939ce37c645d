//! Driver capability probing.
//!
//! Some fragment compilers reject long if/else chains well below the number
//! of texture units the context reports. The sampler dispatch in the sprite
//! shader is such a chain, so its length is found empirically: compile a
//! probe shader with `n` branches and halve `n` until it compiles.

use crate::error::SpriteError;
use crate::gpu::{DisposableContext, ShaderCompiler};
use crate::templates::PROBE_FRAGMENT_TEMPLATE;

/// A chain of `branches` if/else branches; the last one has no test.
pub fn if_test_src(branches: u32) -> String {
    let mut src = String::new();

    for i in 0..branches {
        if i > 0 {
            src.push_str("\nelse ");
        }
        if i + 1 < branches {
            src.push_str(&format!("if(test == {i}.0){{}}"));
        } else {
            src.push_str("{}");
        }
    }

    src
}

/// The probe fragment shader for `branches` branches.
pub fn probe_fragment_src(branches: u32) -> String {
    PROBE_FRAGMENT_TEMPLATE.replace("%forloop%", &if_test_src(branches))
}

/// Largest branch count, reached from `requested` by repeated halving, that
/// `compiler` accepts.
///
/// # Errors
///
/// `CapabilityExhausted` if even the zero-branch shader fails to compile.
pub fn check_max_if_statements<C: ShaderCompiler + ?Sized>(
    compiler: &mut C,
    requested: u32,
) -> Result<u32, SpriteError> {
    let mut branches = requested;

    loop {
        match compiler.compile_fragment(&probe_fragment_src(branches)) {
            Ok(()) => {
                log::debug!("fragment compiler accepts {branches} branches (requested {requested})");
                return Ok(branches);
            }
            Err(_) if branches == 0 => {
                return Err(SpriteError::CapabilityExhausted { requested });
            }
            Err(err) => {
                log::debug!("probe with {branches} branches rejected: {err}");
                branches /= 2;
            }
        }
    }
}

/// A throwaway context that is released when dropped, on every exit path.
pub struct ProbeContext<C: DisposableContext> {
    context: C,
}

impl<C: DisposableContext> ProbeContext<C> {
    pub fn new(context: C) -> Self {
        Self { context }
    }

    pub fn compiler(&mut self) -> &mut C {
        &mut self.context
    }
}

impl<C: DisposableContext> Drop for ProbeContext<C> {
    fn drop(&mut self) {
        self.context.release();
    }
}

/// Probes with `compiler` when one is supplied, otherwise with a context
/// from `create_context` that lives only for the probe.
pub fn probe_max_branches<C, F>(
    compiler: Option<&mut dyn ShaderCompiler>,
    requested: u32,
    create_context: F,
) -> Result<u32, SpriteError>
where
    C: DisposableContext,
    F: FnOnce() -> Result<C, SpriteError>,
{
    match compiler {
        Some(compiler) => check_max_if_statements(compiler, requested),
        None => {
            let mut probe = ProbeContext::new(create_context()?);
            check_max_if_statements(probe.compiler(), requested)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{ShaderError, ShaderStage};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn branch_count(src: &str) -> u32 {
        src.matches("{}").count() as u32
    }

    /// Rejects probe shaders with more than `limit` branches.
    struct LimitedCompiler {
        limit: Option<u32>,
        attempts: Rc<RefCell<Vec<u32>>>,
    }

    impl LimitedCompiler {
        fn new(limit: Option<u32>) -> Self {
            Self {
                limit,
                attempts: Rc::default(),
            }
        }
    }

    impl ShaderCompiler for LimitedCompiler {
        fn compile_fragment(&mut self, source: &str) -> Result<(), ShaderError> {
            let branches = branch_count(source);
            self.attempts.borrow_mut().push(branches);
            match self.limit {
                Some(limit) if branches <= limit => Ok(()),
                _ => Err(ShaderError::CompileError {
                    stage: ShaderStage::Fragment,
                    log: format!("too many branches: {branches}"),
                }),
            }
        }
    }

    struct Disposable {
        inner: LimitedCompiler,
        released: Rc<Cell<u32>>,
    }

    impl ShaderCompiler for Disposable {
        fn compile_fragment(&mut self, source: &str) -> Result<(), ShaderError> {
            self.inner.compile_fragment(source)
        }
    }

    impl DisposableContext for Disposable {
        fn release(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[test]
    fn if_test_src_emits_requested_branches() {
        assert_eq!(if_test_src(0), "");
        assert_eq!(if_test_src(1), "{}");
        assert_eq!(
            if_test_src(3),
            "if(test == 0.0){}\nelse if(test == 1.0){}\nelse {}"
        );
        assert_eq!(branch_count(&probe_fragment_src(12)), 12);
    }

    #[test]
    fn halving_stops_below_driver_limit() {
        let mut compiler = LimitedCompiler::new(Some(7));
        let attempts = compiler.attempts.clone();

        let max = check_max_if_statements(&mut compiler, 32).unwrap();

        assert_eq!(max, 4);
        assert_eq!(*attempts.borrow(), [32, 16, 8, 4]);
    }

    #[test]
    fn accepted_request_is_returned_unchanged() {
        let mut compiler = LimitedCompiler::new(Some(64));
        assert_eq!(check_max_if_statements(&mut compiler, 16).unwrap(), 16);
    }

    #[test]
    fn zero_branches_must_compile() {
        let mut compiler = LimitedCompiler::new(Some(0));
        assert_eq!(check_max_if_statements(&mut compiler, 5).unwrap(), 0);
    }

    #[test]
    fn failing_zero_is_capability_exhausted() {
        let mut compiler = LimitedCompiler::new(None);
        let attempts = compiler.attempts.clone();

        let err = check_max_if_statements(&mut compiler, 8).unwrap_err();

        assert!(matches!(err, SpriteError::CapabilityExhausted { requested: 8 }));
        assert_eq!(*attempts.borrow(), [8, 4, 2, 1, 0]);
    }

    #[test]
    fn supplied_compiler_is_used_without_temporary_context() {
        let mut compiler = LimitedCompiler::new(Some(10));
        let created = Cell::new(false);

        let max = probe_max_branches(Some(&mut compiler), 16, || {
            created.set(true);
            Err::<Disposable, _>(SpriteError::Gpu("unused".into()))
        })
        .unwrap();

        assert_eq!(max, 8);
        assert!(!created.get());
    }

    #[test]
    fn temporary_context_is_released_after_success() {
        let released = Rc::new(Cell::new(0));
        let context = Disposable {
            inner: LimitedCompiler::new(Some(16)),
            released: released.clone(),
        };

        let max = probe_max_branches(None, 16, || Ok(context)).unwrap();

        assert_eq!(max, 16);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn temporary_context_is_released_after_failure() {
        let released = Rc::new(Cell::new(0));
        let context = Disposable {
            inner: LimitedCompiler::new(None),
            released: released.clone(),
        };

        let err = probe_max_branches(None, 4, || Ok(context)).unwrap_err();

        assert!(matches!(err, SpriteError::CapabilityExhausted { .. }));
        assert_eq!(released.get(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn probe_never_exceeds_limit(requested in 0u32..256, limit in 0u32..256) {
                let mut compiler = LimitedCompiler::new(Some(limit));
                let max = check_max_if_statements(&mut compiler, requested).unwrap();

                prop_assert!(max <= limit);
                prop_assert!(max <= requested);
                // Only halvings of the request are ever tried.
                let mut n = requested;
                while n > max {
                    n /= 2;
                }
                prop_assert_eq!(n, max);
            }
        }
    }
}
