//! Calling natives and user functions.

use ren_cell::Cell;

use super::{Escape, EvalResult, Interp};
use crate::errors::{self, ErrorKind};
use crate::heap::{BindMode, Frame, FuncId, Heap, Param, ParamClass, SeriesId};
use crate::layout::{self, tag};
use crate::mold;
use crate::natives;
use crate::symbols::SymbolTable;

impl Interp<'_> {
    /// Parameters of a native or function.
    pub(crate) fn params_of(&mut self, func: &Cell) -> Result<Vec<Param>, Escape> {
        match layout::tag_of(func) {
            tag::NATIVE => {
                let def = natives::lookup(layout::native_index(func))
                    .ok_or_else(|| errors::stale("native"))?;
                Ok(def
                    .params
                    .iter()
                    .map(|spec| native_param(&mut self.heap.symbols, spec))
                    .collect())
            }
            tag::FUNCTION => Ok(self.heap.func(layout::func_id(func))?.params.clone()),
            _ => Err(errors::not_callable(mold::mold(self.heap, func, false)).into()),
        }
    }

    /// Gather arguments for `func` from the array at `pos`, then call it.
    /// `refinements` are the words after the function in a path.
    pub(crate) fn invoke(
        &mut self,
        func: Cell,
        label: &str,
        refinements: &[Cell],
        sid: SeriesId,
        mut pos: usize,
    ) -> Result<(Cell, usize), Escape> {
        let params = self.params_of(&func)?;
        let mut args = vec![layout::none(); params.len()];

        for (i, param) in params.iter().enumerate() {
            match param.class {
                ParamClass::Refinement => break,
                ParamClass::Local => {}
                ParamClass::Normal | ParamClass::Quoted => {
                    let (value, next) = self.gather_arg(param, label, sid, pos)?;
                    args[i] = value;
                    pos = next;
                }
            }
        }

        for refine in refinements {
            if layout::tag_of(refine) != tag::WORD {
                let shown = mold::mold(self.heap, refine, false);
                return Err(errors::invalid_path(label, shown).into());
            }
            let canon = self.heap.symbols.canon(layout::word_symbol(refine));
            let Some(slot) = params
                .iter()
                .position(|p| p.class == ParamClass::Refinement && p.symbol == canon)
            else {
                return Err(errors::no_refine(label, self.heap.name(refine)).into());
            };
            args[slot] = layout::logic(true);
            for (k, param) in params.iter().enumerate().skip(slot + 1) {
                if !matches!(param.class, ParamClass::Normal | ParamClass::Quoted) {
                    break;
                }
                let (value, next) = self.gather_arg(param, label, sid, pos)?;
                args[k] = value;
                pos = next;
            }
        }

        let result = self.call_with(func, &args)?;
        Ok((result, pos))
    }

    fn gather_arg(
        &mut self,
        param: &Param,
        label: &str,
        sid: SeriesId,
        pos: usize,
    ) -> Result<(Cell, usize), Escape> {
        if pos >= self.heap.series_len(sid)? {
            let name = self.heap.symbols.name(param.symbol).to_owned();
            return Err(errors::no_arg(label, &name).into());
        }
        match param.class {
            ParamClass::Quoted => {
                let value = self.heap.array_at(sid, pos)?.unwrap_or_else(layout::none);
                Ok((value, pos + 1))
            }
            _ => self.eval_step(sid, pos),
        }
    }

    /// Call with arguments already in parameter order.
    pub(crate) fn call_with(&mut self, func: Cell, args: &[Cell]) -> EvalResult {
        match layout::tag_of(&func) {
            tag::NATIVE => self.call_native(layout::native_index(&func), args),
            tag::FUNCTION => self.call_function(layout::func_id(&func), args),
            _ => Err(errors::not_callable(mold::mold(self.heap, &func, false)).into()),
        }
    }

    pub(crate) fn call_native(&mut self, index: usize, args: &[Cell]) -> EvalResult {
        let def = natives::lookup(index).ok_or_else(|| errors::stale("native"))?;
        (def.func)(self, args)
    }

    /// Run a user function: fresh frame for the parameters, fresh copy of
    /// the body rebound to that frame.
    fn call_function(&mut self, id: FuncId, args: &[Cell]) -> EvalResult {
        let node = self.heap.func(id)?.clone();
        let mut frame = Frame::new(None);
        let values = args.iter().copied().chain(std::iter::repeat(layout::none()));
        for (param, value) in node.params.iter().zip(values) {
            frame.add(param.symbol, value);
        }
        let frame = self.heap.alloc_frame(frame);
        let body = self.heap.copy_series(&node.body, true)?;
        self.heap.bind_array(&body, frame, BindMode::ExistingOnly)?;
        match self.do_array(&body) {
            Err(Escape::Return(value)) => Ok(value),
            other => other,
        }
    }
}

/// `"value"`, `"'word"` or `"/refinement"`.
fn native_param(symbols: &mut SymbolTable, spec: &str) -> Param {
    let (class, name) = if let Some(name) = spec.strip_prefix('/') {
        (ParamClass::Refinement, name)
    } else if let Some(name) = spec.strip_prefix('\'') {
        (ParamClass::Quoted, name)
    } else {
        (ParamClass::Normal, spec)
    };
    let sym = symbols.intern(name);
    Param {
        symbol: symbols.canon(sym),
        class,
    }
}

/// Parameters from a `func` spec block.
///
/// Words are evaluated arguments, lit-words are quoted arguments,
/// refinements start optional groups, and everything after `/local` is a
/// local. Strings (docs), blocks (type lists) and set-words are skipped.
pub(crate) fn parse_spec(heap: &mut Heap, items: &[Cell]) -> Result<Vec<Param>, ErrorKind> {
    let mut params = Vec::new();
    let mut locals = false;
    for item in items {
        let t = layout::tag_of(item);
        let class = match t {
            tag::WORD | tag::GET_WORD if locals => ParamClass::Local,
            tag::WORD | tag::GET_WORD => ParamClass::Normal,
            tag::LIT_WORD if locals => ParamClass::Local,
            tag::LIT_WORD => ParamClass::Quoted,
            tag::REFINEMENT => {
                if heap.name(item).eq_ignore_ascii_case("local") {
                    locals = true;
                    continue;
                }
                if locals {
                    return Err(errors::invalid_arg(mold::mold(heap, item, false)));
                }
                ParamClass::Refinement
            }
            tag::STRING | tag::BLOCK | tag::SET_WORD => continue,
            _ => return Err(errors::invalid_arg(mold::mold(heap, item, false))),
        };
        params.push(Param {
            symbol: heap.symbols.canon(layout::word_symbol(item)),
            class,
        });
    }
    Ok(params)
}
