// SPDX-FileCopyrightText: 2026 ECSCM Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned server payloads.

/// Three configurations over two plugins: `config1` and `config2` belong to
/// `pluginA`, `config3` to `pluginB`.
pub const GOOD_RESPONSE: &str = "<response>\
  <cfgs>\
    <cfg>\
      <name>config1</name>\
      <plugin>pluginA</plugin>\
      <desc>pluginA configuration</desc>\
    </cfg>\
    <cfg>\
      <name>config2</name>\
      <plugin>pluginA</plugin>\
      <desc>Another pluginA configuration</desc>\
    </cfg>\
    <cfg>\
      <name>config3</name>\
      <plugin>pluginB</plugin>\
      <desc>pluginB configuration</desc>\
    </cfg>\
  </cfgs>\
</response>";

pub const ERROR_RESPONSE: &str = "<response>\
  <error>There was an error.</error>\
</response>";

pub const EMPTY_RESPONSE: &str = "<response><cfgs></cfgs></response>";

/// An entry field and a text area.
pub const EDITOR_DEFINITION_A: &str = "<editor>\
  <formElement>\
    <type>entry</type>\
    <label>Field #1</label>\
    <property>field1</property>\
    <documentation>The first field of the form</documentation>\
  </formElement>\
  <formElement>\
    <type>textarea</type>\
    <label>Field #2</label>\
    <property>field2</property>\
    <documentation>The second field of the form</documentation>\
  </formElement>\
</editor>";

/// A checked checkbox and an entry field.
pub const EDITOR_DEFINITION_B: &str = "<editor>\
  <formElement>\
    <type>checkbox</type>\
    <label>Field #1</label>\
    <property>field1</property>\
    <checkedValue>1</checkedValue>\
    <uncheckedValue>0</uncheckedValue>\
    <initiallyChecked>1</initiallyChecked>\
    <documentation>The first field of the form</documentation>\
  </formElement>\
  <formElement>\
    <type>entry</type>\
    <label>Field #2</label>\
    <property>field2</property>\
    <documentation>The second field of the form</documentation>\
  </formElement>\
</editor>";

/// A `createConfig` form with a required name and a credential.
pub const CREATE_CONFIG_FORM: &str = "<editor>\
  <formElement>\
    <type>entry</type>\
    <label>Configuration Name:</label>\
    <property>config</property>\
    <required>1</required>\
  </formElement>\
  <formElement>\
    <type>entry</type>\
    <label>Description:</label>\
    <property>desc</property>\
  </formElement>\
  <formElement>\
    <type>credential</type>\
    <label>Login As:</label>\
    <property>credential</property>\
    <required>1</required>\
  </formElement>\
</editor>";
