// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! XML encoding for the UCS Manager API.
//!
//! The API only uses elements and attributes, never text content, so a
//! document is modelled as a plain element tree.

use std::collections::BTreeMap;

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::ucs::mo::ManagedObject;

pub const ERROR_CODE: &str = "errorCode";
pub const ERROR_DESCR: &str = "errorDescr";
pub const COOKIE: &str = "cookie";
pub const IN_HIERARCHICAL: &str = "inHierarchical";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        loop {
            match reader.read_event().map_err(Error::xml)? {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced closing tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(element),
                    }
                }
                Event::Eof => return Err(Error::Xml("document has no root element".to_string())),
                _ => {}
            }
        }
    }

    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner()).map_err(Error::xml)
    }

    /// Turn an API error response into [`Error::Api`].
    pub fn check_error(&self) -> Result<()> {
        match self.attr(ERROR_CODE) {
            Some(code) => Err(Error::Api {
                code: code.to_string(),
                description: self.attr(ERROR_DESCR).unwrap_or_default().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Managed objects listed under the `outConfigs`/`outConfig` child.
    pub fn out_objects(&self, container: &str) -> Vec<ManagedObject> {
        self.child(container)
            .map(|out| {
                out.children
                    .iter()
                    .cloned()
                    .map(ManagedObject::from_element)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(Error::xml)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(Error::xml)?.into_owned();
        element.attrs.insert(key, value);
    }
    Ok(element)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(Error::xml);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(Error::xml)?;
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(Error::xml)
}

/// Request builders for the XML API methods the modules use.
pub mod request {
    use super::{XmlElement, COOKIE, IN_HIERARCHICAL};

    pub fn login(username: &str, password: &str) -> XmlElement {
        XmlElement::new("aaaLogin")
            .with_attr("inName", username)
            .with_attr("inPassword", password)
    }

    pub fn logout(cookie: &str) -> XmlElement {
        XmlElement::new("aaaLogout").with_attr("inCookie", cookie)
    }

    pub fn resolve_classes(cookie: &str, class_ids: &[&str]) -> XmlElement {
        let ids = class_ids.iter().fold(XmlElement::new("inIds"), |ids, id| {
            ids.with_child(XmlElement::new("Id").with_attr("value", *id))
        });
        XmlElement::new("configResolveClasses")
            .with_attr(COOKIE, cookie)
            .with_attr(IN_HIERARCHICAL, "false")
            .with_child(ids)
    }

    pub fn resolve_dn(cookie: &str, dn: &str) -> XmlElement {
        XmlElement::new("configResolveDn")
            .with_attr(COOKIE, cookie)
            .with_attr("dn", dn)
            .with_attr(IN_HIERARCHICAL, "false")
    }

    pub fn resolve_children(cookie: &str, in_dn: &str, class_id: &str) -> XmlElement {
        XmlElement::new("configResolveChildren")
            .with_attr(COOKIE, cookie)
            .with_attr("inDn", in_dn)
            .with_attr("classId", class_id)
            .with_attr(IN_HIERARCHICAL, "false")
    }

    /// `configConfMos` with one `pair` per staged object, keyed by DN.
    pub fn conf_mos(cookie: &str, objects: Vec<(String, XmlElement)>) -> XmlElement {
        let configs = objects
            .into_iter()
            .fold(XmlElement::new("inConfigs"), |configs, (dn, object)| {
                configs.with_child(XmlElement::new("pair").with_attr("key", dn).with_child(object))
            });
        XmlElement::new("configConfMos")
            .with_attr(COOKIE, cookie)
            .with_attr(IN_HIERARCHICAL, "false")
            .with_child(configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login_response() {
        let xml = r#"<aaaLogin cookie="" response="yes" outCookie="1700000000/abcd" outRefreshPeriod="600" outPriv="admin"> </aaaLogin>"#;
        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name, "aaaLogin");
        assert_eq!(root.attr("outCookie"), Some("1700000000/abcd"));
        assert!(root.check_error().is_ok());
    }

    #[test]
    fn test_parse_error_response() {
        let xml = r#"<aaaLogin cookie="" response="yes" errorCode="551" invocationResult="unidentified-fail" errorDescr="Authorization failed"/>"#;
        let root = XmlElement::parse(xml).unwrap();
        let err = root.check_error().unwrap_err();
        assert_eq!(err.to_string(), "551: Authorization failed");
    }

    #[test]
    fn test_out_configs_become_managed_objects() {
        let xml = r#"<?xml version="1.0"?>
            <configResolveClasses cookie="c" response="yes">
              <outConfigs>
                <computeRackUnit dn="sys/rack-unit-1" serial="RK39"/>
                <computeBlade dn="sys/chassis-5/blade-1" serial="SRV90"/>
              </outConfigs>
            </configResolveClasses>"#;
        let root = XmlElement::parse(xml).unwrap();
        let objects = root.out_objects("outConfigs");
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].class_id, "computeRackUnit");
        assert_eq!(objects[1].dn(), "sys/chassis-5/blade-1");
        assert!(root.out_objects("outConfig").is_empty());
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let element = request::login("admin", "p<w>&\"d");
        let xml = element.to_xml().unwrap();
        assert!(!xml.contains("p<w>"));
        assert_eq!(XmlElement::parse(&xml).unwrap(), element);
    }

    #[test]
    fn test_resolve_classes_request_shape() {
        let element = request::resolve_classes("c", &["computeRackUnit", "computeBlade"]);
        let ids = element.child("inIds").unwrap();
        let values: Vec<_> = ids.children.iter().filter_map(|c| c.attr("value")).collect();
        assert_eq!(values, vec!["computeRackUnit", "computeBlade"]);
        assert_eq!(element.attr(COOKIE), Some("c"));
    }

    #[test]
    fn test_parse_rejects_empty_document() {
        assert!(XmlElement::parse("").is_err());
        assert!(XmlElement::parse("<a><b></a>").is_err());
    }
}
