use super::{GenerateOptions, GenerateResult, Generator, Output, StatusModel, member_name};
use std::collections::HashMap;

const LICENSE: &str = r#"/*-
 *
 * Hedera JavaScript SDK
 *
 * Copyright (C) 2020 - 2022 Hedera Hashgraph, LLC
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 *
 */"#;

/// Emits a JavaScript status-code class: constructor, `toString()`,
/// `_fromCode()`, `valueOf()` and one static instance per enum value.
pub struct StatusClassGenerator;

impl StatusClassGenerator {
    pub fn new() -> Self {
        Self
    }

    fn emit_typedef(&self, out: &mut Output, options: &GenerateOptions) {
        out.line("/**");
        out.line(" * @namespace proto");
        out.line(&format!(
            " * @typedef {{import(\"@hashgraph/proto\").proto.{0}}} HashgraphProto.proto.{0}",
            options.enum_name
        ));
        out.line(" */");
    }

    fn emit_constructor(&self, out: &mut Output) {
        out.line("/**");
        out.line(" * @hideconstructor");
        out.line(" * @internal");
        out.line(" * @param {number} code");
        out.line(" */");
        out.line("constructor(code) {");
        out.indent();
        out.line("/** @readonly */");
        out.line("this._code = code;");
        out.blank();
        out.line("Object.freeze(this);");
        out.dedent();
        out.line("}");
    }

    fn emit_to_string(
        &self,
        out: &mut Output,
        model: &StatusModel,
        options: &GenerateOptions,
        source_lines: &HashMap<&str, usize>,
    ) {
        let class = &options.class_name;

        out.line("/**");
        out.line(" * @returns {string}");
        out.line(" */");
        out.line("toString() {");
        out.indent();
        out.line("switch (this) {");
        out.indent();
        for (name, ident) in model.to_string.iter() {
            let member = member_name(ident, options.name_style);
            let src_line = source_lines.get(name).copied().unwrap_or_default();
            out.line_mapped(&format!("case {}.{}:", class, member), src_line);
            out.indent();
            out.line(&format!("return \"{}\";", ident));
            out.dedent();
        }
        out.line("default:");
        out.indent();
        out.line("return `UNKNOWN (${this._code})`;");
        out.dedent();
        out.dedent();
        out.line("}");
        out.dedent();
        out.line("}");
    }

    fn emit_from_code(
        &self,
        out: &mut Output,
        model: &StatusModel,
        options: &GenerateOptions,
        source_lines: &HashMap<&str, usize>,
    ) {
        let class = &options.class_name;

        out.line("/**");
        out.line(" * @internal");
        out.line(" * @param {number} code");
        out.line(&format!(" * @returns {{{}}}", class));
        out.line(" */");
        out.line("static _fromCode(code) {");
        out.indent();
        out.line("switch (code) {");
        out.indent();
        for (code, ident) in model.from_code.iter() {
            let member = member_name(ident, options.name_style);
            let src_line = source_lines.get(ident).copied().unwrap_or_default();
            out.line_mapped(&format!("case {}:", code), src_line);
            out.indent();
            out.line(&format!("return {}.{};", class, member));
            out.dedent();
        }
        out.line("default:");
        out.indent();
        out.line("throw new Error(");
        out.indent();
        out.line(&format!(
            "`(BUG) {}.fromCode() does not handle code: ${{code}}`",
            class
        ));
        out.dedent();
        out.line(");");
        out.dedent();
        out.dedent();
        out.line("}");
        out.dedent();
        out.line("}");
    }

    fn emit_value_of(&self, out: &mut Output, options: &GenerateOptions) {
        out.line("/**");
        out.line(&format!(
            " * @returns {{HashgraphProto.proto.{}}}",
            options.enum_name
        ));
        out.line(" */");
        out.line("valueOf() {");
        out.indent();
        out.line("return this._code;");
        out.dedent();
        out.line("}");
    }

    fn emit_constants(&self, out: &mut Output, model: &StatusModel, options: &GenerateOptions) {
        let class = &options.class_name;

        for constant in &model.constants {
            out.blank();
            if !constant.doc.is_empty() {
                out.line("/**");
                for doc_line in &constant.doc {
                    if doc_line.is_empty() {
                        out.line(" *");
                    } else {
                        out.line(&format!(" * {}", doc_line.replace("*/", "*\\/")));
                    }
                }
                out.line(" */");
            }
            out.line_mapped(
                &format!(
                    "{0}.{1} = new {0}({2});",
                    class,
                    member_name(&constant.name, options.name_style),
                    constant.number
                ),
                constant.src_line,
            );
        }
    }
}

impl Default for StatusClassGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for StatusClassGenerator {
    fn generate(&self, model: &StatusModel, options: &GenerateOptions) -> GenerateResult {
        let source_lines: HashMap<&str, usize> = model
            .constants
            .iter()
            .map(|c| (c.name.as_str(), c.src_line))
            .collect();

        let mut out = Output::new();

        if options.license_header {
            for line in LICENSE.lines() {
                out.line(line);
            }
            out.blank();
        }

        self.emit_typedef(&mut out, options);
        out.blank();
        out.line(&format!("export default class {} {{", options.class_name));
        out.indent();
        self.emit_constructor(&mut out);
        out.blank();
        self.emit_to_string(&mut out, model, options, &source_lines);
        out.blank();
        self.emit_from_code(&mut out, model, options, &source_lines);
        out.blank();
        self.emit_value_of(&mut out, options);
        out.dedent();
        out.line("}");

        self.emit_constants(&mut out, model, options);

        let (code, mappings) = out.finish();
        GenerateResult { code, mappings }
    }
}
