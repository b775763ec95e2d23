//! Recursive-descent parser over the token stream from [`crate::lexer`],
//! producing the raw parse tree in [`crate::ast`] (spec §4.2). No
//! semantic checks happen here — an unresolved identifier in WHERE, an
//! unknown type tag, a property key that never occurs in the graph are
//! all syntactically fine and resolved (or silently ignored) later.

use crate::ast::*;
use crate::error::{Error, Result};
use crate::lexer::{tokenize, Token, TokenKind};
use graphcore_api::Scalar;

pub fn parse(input: &str) -> Result<Pattern> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let pattern = parser.parse_pattern()?;
    parser.expect(&TokenKind::Eof)?;
    Ok(pattern)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn peek_pos(&self) -> (usize, usize) {
        let t = &self.tokens[self.pos];
        (t.line, t.column)
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.tokens[self.pos].kind.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn err(&self, message: impl Into<String>) -> Error {
        let (line, column) = self.peek_pos();
        Error::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.peek() == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected {:?}, found {:?}", kind, self.peek())))
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.advance() {
            TokenKind::Ident(s) => Ok(s),
            other => Err(self.err(format!("expected identifier, found {other:?}"))),
        }
    }

    // Pattern ::= [MATCH] PatternPath [WHERE BoolExpr] [RETURN ...]
    //             [ORDER BY ...] [SKIP Int] [LIMIT Int]
    fn parse_pattern(&mut self) -> Result<Pattern> {
        self.eat(&TokenKind::Match);
        let path = self.parse_pattern_path()?;

        let where_clause = if self.eat(&TokenKind::Where) {
            Some(self.parse_or_expr()?)
        } else {
            None
        };

        let return_items = if self.eat(&TokenKind::Return) {
            let mut items = vec![self.parse_ret_item()?];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_ret_item()?);
            }
            Some(items)
        } else {
            None
        };

        let order_by = if self.eat(&TokenKind::Order) {
            self.expect(&TokenKind::By)?;
            let mut items = vec![self.parse_order_item()?];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_order_item()?);
            }
            Some(items)
        } else {
            None
        };

        let skip = if self.eat(&TokenKind::Skip) {
            Some(self.parse_int_literal()?)
        } else {
            None
        };

        let limit = if self.eat(&TokenKind::Limit) {
            Some(self.parse_int_literal()?)
        } else {
            None
        };

        Ok(Pattern {
            path,
            where_clause,
            return_items,
            order_by,
            skip,
            limit,
        })
    }

    fn parse_int_literal(&mut self) -> Result<i64> {
        match self.advance() {
            TokenKind::Int(n) => Ok(n),
            other => Err(self.err(format!("expected integer, found {other:?}"))),
        }
    }

    fn parse_pattern_path(&mut self) -> Result<PatternPath> {
        let start = self.parse_node_expr()?;
        let mut hops = Vec::new();
        loop {
            match self.peek() {
                TokenKind::Dash | TokenKind::LArrow => {
                    let edge = self.parse_edge_expr()?;
                    let node = self.parse_node_expr()?;
                    hops.push((edge, node));
                }
                _ => break,
            }
        }
        Ok(PatternPath { start, hops })
    }

    // NodeExpr ::= Ident (':' Ident)? ('{' PropFilter (',' PropFilter)* '}')?
    fn parse_node_expr(&mut self) -> Result<NodeExpr> {
        let var = self.expect_ident()?;
        let type_tag = if self.eat(&TokenKind::Colon) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        let filters = self.parse_optional_filter_block()?;
        Ok(NodeExpr {
            var,
            type_tag,
            filters,
        })
    }

    fn parse_optional_filter_block(&mut self) -> Result<Vec<InlineFilter>> {
        if !self.eat(&TokenKind::LBrace) {
            return Ok(Vec::new());
        }
        let mut filters = vec![self.parse_prop_filter()?];
        while self.eat(&TokenKind::Comma) {
            filters.push(self.parse_prop_filter()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(filters)
    }

    // PropFilter ::= label '=' Text | label '~' Text | key Op Scalar
    fn parse_prop_filter(&mut self) -> Result<InlineFilter> {
        let key = self.expect_ident()?;
        if key == "label" && matches!(self.peek(), TokenKind::Eq | TokenKind::Tilde) {
            let op = if self.eat(&TokenKind::Eq) {
                LabelOp::Eq
            } else {
                self.expect(&TokenKind::Tilde)?;
                LabelOp::Contains
            };
            let text = self.expect_string_literal()?;
            return Ok(InlineFilter::Label(op, text));
        }
        let op = self.parse_inline_cmp_op()?;
        let value = self.parse_scalar_literal()?;
        Ok(InlineFilter::Prop(key, op, value))
    }

    fn parse_inline_cmp_op(&mut self) -> Result<CmpOp> {
        let op = match self.peek() {
            TokenKind::Colon | TokenKind::Eq => CmpOp::Eq,
            TokenKind::Ne => CmpOp::Ne,
            TokenKind::Gt => CmpOp::Gt,
            TokenKind::Ge => CmpOp::Ge,
            TokenKind::Lt => CmpOp::Lt,
            TokenKind::Le => CmpOp::Le,
            TokenKind::Tilde => CmpOp::Substring,
            other => return Err(self.err(format!("expected a comparison operator, found {other:?}"))),
        };
        self.advance();
        Ok(op)
    }

    fn expect_string_literal(&mut self) -> Result<String> {
        match self.advance() {
            TokenKind::Str(s) => Ok(s),
            other => Err(self.err(format!("expected string literal, found {other:?}"))),
        }
    }

    fn parse_scalar_literal(&mut self) -> Result<Scalar> {
        match self.advance() {
            TokenKind::Str(s) => Ok(Scalar::Text(s)),
            TokenKind::Int(n) => Ok(Scalar::Int(n)),
            TokenKind::Float(f) => Ok(Scalar::Float(f)),
            TokenKind::True => Ok(Scalar::Bool(true)),
            TokenKind::False => Ok(Scalar::Bool(false)),
            TokenKind::Null => Ok(Scalar::Null),
            TokenKind::Dash => match self.advance() {
                TokenKind::Int(n) => Ok(Scalar::Int(-n)),
                TokenKind::Float(f) => Ok(Scalar::Float(-f)),
                other => Err(self.err(format!("expected number after '-', found {other:?}"))),
            },
            other => Err(self.err(format!("expected a scalar literal, found {other:?}"))),
        }
    }

    // EdgeExpr ::= '-' EdgeBody? '->'   (forward)
    //            | '<-' EdgeBody? '-'   (backward)
    fn parse_edge_expr(&mut self) -> Result<EdgeExpr> {
        let direction = match self.advance() {
            TokenKind::Dash => Direction::Forward,
            TokenKind::LArrow => Direction::Backward,
            other => return Err(self.err(format!("expected '-' or '<-', found {other:?}"))),
        };

        let (var, types, var_len, filters) = if self.eat(&TokenKind::LBracket) {
            let var = match self.peek() {
                TokenKind::Ident(_) => Some(self.expect_ident()?),
                _ => None,
            };
            let types = if self.eat(&TokenKind::Colon) {
                let mut list = vec![self.expect_ident()?];
                while self.eat(&TokenKind::Pipe) {
                    list.push(self.expect_ident()?);
                }
                Some(list)
            } else {
                None
            };
            let var_len = if self.eat(&TokenKind::Star) {
                Some(self.parse_var_len_spec()?)
            } else {
                None
            };
            let filters = self.parse_optional_filter_block()?;
            self.expect(&TokenKind::RBracket)?;
            (var, types, var_len, filters)
        } else {
            (None, None, None, Vec::new())
        };

        match direction {
            Direction::Forward => self.expect(&TokenKind::Arrow)?,
            Direction::Backward => self.expect(&TokenKind::Dash)?,
        }

        Ok(EdgeExpr {
            var,
            types,
            direction,
            var_len,
            filters,
        })
    }

    // VarLenSpec ::= Int? '..' Int? | Int
    fn parse_var_len_spec(&mut self) -> Result<VarLenSpec> {
        if let TokenKind::Int(_) = self.peek() {
            let TokenKind::Int(n) = self.advance() else {
                unreachable!()
            };
            if self.eat(&TokenKind::DotDot) {
                let max = if let TokenKind::Int(_) = self.peek() {
                    let TokenKind::Int(m) = self.advance() else {
                        unreachable!()
                    };
                    Some(m as u32)
                } else {
                    None
                };
                return Ok(VarLenSpec {
                    min: Some(n as u32),
                    max,
                    exact: false,
                });
            }
            return Ok(VarLenSpec {
                min: Some(n as u32),
                max: Some(n as u32),
                exact: true,
            });
        }
        if self.eat(&TokenKind::DotDot) {
            let max = if let TokenKind::Int(_) = self.peek() {
                let TokenKind::Int(m) = self.advance() else {
                    unreachable!()
                };
                Some(m as u32)
            } else {
                None
            };
            return Ok(VarLenSpec {
                min: None,
                max,
                exact: false,
            });
        }
        Ok(VarLenSpec {
            min: None,
            max: None,
            exact: false,
        })
    }

    // RetItem ::= (Ident | Ident '.' Ident) (AS Ident)?
    fn parse_ret_item(&mut self) -> Result<RetItem> {
        let source = self.parse_ref_source()?;
        let alias = if self.eat(&TokenKind::As) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        Ok(RetItem { source, alias })
    }

    fn parse_ref_source(&mut self) -> Result<RefSource> {
        let name = self.expect_ident()?;
        if self.eat(&TokenKind::Dot) {
            let prop = self.expect_ident()?;
            Ok(RefSource::Prop(name, prop))
        } else {
            Ok(RefSource::Var(name))
        }
    }

    fn parse_order_item(&mut self) -> Result<OrderItem> {
        let key = self.parse_ref_source()?;
        let direction = match self.peek() {
            TokenKind::Ident(s) if s.eq_ignore_ascii_case("asc") => {
                self.advance();
                OrderDir::Asc
            }
            TokenKind::Ident(s) if s.eq_ignore_ascii_case("desc") => {
                self.advance();
                OrderDir::Desc
            }
            _ => OrderDir::Asc,
        };
        Ok(OrderItem { key, direction })
    }

    // BoolExpr, precedence: OR < AND < NOT < Comparison, parens allowed.
    fn parse_or_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and_expr()?;
        while self.eat(&TokenKind::Or) {
            let rhs = self.parse_and_expr()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_not_expr()?;
        while self.eat(&TokenKind::And) {
            let rhs = self.parse_not_expr()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not_expr(&mut self) -> Result<Expr> {
        if self.eat(&TokenKind::Not) {
            return Ok(Expr::Not(Box::new(self.parse_not_expr()?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        if self.eat(&TokenKind::LParen) {
            let inner = self.parse_or_expr()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(inner);
        }
        let lhs = self.parse_atom()?;
        let op = self.parse_where_cmp_op()?;
        let rhs = self.parse_atom()?;
        Ok(Expr::Compare(lhs, op, rhs))
    }

    fn parse_where_cmp_op(&mut self) -> Result<CmpOp> {
        match self.peek() {
            TokenKind::Eq => {
                self.advance();
                Ok(CmpOp::Eq)
            }
            TokenKind::Ne => {
                self.advance();
                Ok(CmpOp::Ne)
            }
            TokenKind::Gt => {
                self.advance();
                Ok(CmpOp::Gt)
            }
            TokenKind::Ge => {
                self.advance();
                Ok(CmpOp::Ge)
            }
            TokenKind::Lt => {
                self.advance();
                Ok(CmpOp::Lt)
            }
            TokenKind::Le => {
                self.advance();
                Ok(CmpOp::Le)
            }
            TokenKind::Starts => {
                self.advance();
                self.expect(&TokenKind::With)?;
                Ok(CmpOp::StartsWith)
            }
            TokenKind::Ends => {
                self.advance();
                self.expect(&TokenKind::With)?;
                Ok(CmpOp::EndsWith)
            }
            TokenKind::Contains => {
                self.advance();
                Ok(CmpOp::Contains)
            }
            other => Err(self.err(format!("expected a comparison operator, found {other:?}"))),
        }
    }

    // Atom ::= 'type' '(' Ident ')' | Ident '.' Ident | Scalar
    fn parse_atom(&mut self) -> Result<Atom> {
        if let TokenKind::Ident(name) = self.peek().clone() {
            if name.eq_ignore_ascii_case("type") {
                let checkpoint = self.pos;
                self.advance();
                if self.eat(&TokenKind::LParen) {
                    let var = self.expect_ident()?;
                    self.expect(&TokenKind::RParen)?;
                    return Ok(Atom::TypeOf(var));
                }
                self.pos = checkpoint;
            }
            self.advance();
            self.expect(&TokenKind::Dot)?;
            let prop = self.expect_ident()?;
            return Ok(Atom::Prop(name, prop));
        }
        Ok(Atom::Lit(self.parse_scalar_literal()?))
    }
}
