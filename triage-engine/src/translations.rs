//! Tagalog and Cebuano translations of actions and summaries
//!
//! Lookup is by the exact English string. Anything without a translation
//! (or with an empty one) is returned in English.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::actions::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PreferredLanguage {
    English,
    #[default]
    Tagalog,
    Cebuano,
}

impl PreferredLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredLanguage::English => "English",
            PreferredLanguage::Tagalog => "Tagalog",
            PreferredLanguage::Cebuano => "Cebuano",
        }
    }
}

impl fmt::Display for PreferredLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferredLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(PreferredLanguage::English),
            "tagalog" | "filipino" | "tl" | "fil" => Ok(PreferredLanguage::Tagalog),
            "cebuano" | "bisaya" | "ceb" => Ok(PreferredLanguage::Cebuano),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

const TAGALOG: &[(&str, &str)] = &[
    (REFER_TO_HOSPITAL, "Pumunta sa pinakamalapit na ospital kaagad."),
    (MONITOR_ABC, "Bantayan ang daanan ng hangin, paghinga, at sirkulasyon."),
    (DO_NOT_DELAY, "Huwag mag-antala sa paghahanap ng emergency medical care."),
    (CLINIC_FOLLOW_UP, "Mag-schedule ng follow-up sa clinic sa loob ng 24 na oras."),
    (HYDRATION_AND_VITALS, "Magbigay ng hydration at bantayan ang vital signs nang regular."),
    (MONITOR_BREATHING, "Bantayan ang paghinga at humingi ng tulong kung lumala ang sintomas."),
    (REST_AND_HYDRATION, "Magpahinga at uminom ng tubig."),
    (REASSESS_48H, "Mag-reassess kung magpapatuloy ang sintomas pagkatapos ng 48 oras."),
    (OTC_COLD_MEDICATION, "Maaaring makatulong ang over-the-counter na gamot sa sipon."),
    (CHECK_SYMPTOMS, "Pakisiguro na lahat ng sintomas ay tama ang naipasok."),
    (TRY_AGAIN, "Subukan ulit o kumonsulta sa healthcare provider."),
    (SUMMARY_CRITICAL, "Mukhang malubha ang kondisyon. Pumunta kaagad sa pinakamalapit na ospital."),
    (SUMMARY_CRITICAL_CONDITION, "May palatandaan ng posibleng emergency. Pumunta kaagad sa pinakamalapit na ospital."),
    (SUMMARY_MODERATE, "Kailangang bantayan ang kondisyon. Magpatingin sa clinic sa loob ng 24 na oras at patuloy na bantayan ang vital signs."),
    (SUMMARY_MODERATE_BREATHING, "Kailangang bantayang mabuti ang paghinga. Magpatingin sa clinic sa loob ng 24 na oras."),
    (SUMMARY_MILD, "Mukhang mild ang kondisyon ngayon. Magpahinga, uminom ng tubig, at bantayan ang sintomas."),
    (SUMMARY_UNABLE, "Hindi makumpleto ang assessment. Subukan ulit o kumonsulta sa healthcare provider."),
];

const CEBUANO: &[(&str, &str)] = &[
    (REFER_TO_HOSPITAL, "Adto dayon sa pinakaduol nga ospital."),
    (MONITOR_ABC, "Bantayi ang agianan sa hangin, pagginhawa, ug sirkulasyon."),
    (DO_NOT_DELAY, "Ayaw paglangan sa pagpangita og emergency medical care."),
    (CLINIC_FOLLOW_UP, "Mag-schedule og follow-up sa clinic sulod sa 24 ka oras."),
    (HYDRATION_AND_VITALS, "Hatagi og hydration ug bantayi ang vital signs kanunay."),
    (MONITOR_BREATHING, "Bantayi ang pagginhawa ug mangayo og tabang kung molala ang sintomas."),
    (REST_AND_HYDRATION, "Pahulay ug inom og tubig."),
    (REASSESS_48H, "Mag-reassess kung magpadayon ang sintomas human sa 48 ka oras."),
    (OTC_COLD_MEDICATION, "Makatabang ang over-the-counter nga tambal sa sip-on."),
    (CHECK_SYMPTOMS, "Palihug siguroha nga tanan nga sintomas tama ang naipasok."),
    (TRY_AGAIN, "Sulayi pag-usab o mangonsulta sa healthcare provider."),
    (SUMMARY_CRITICAL, "Morag grabe ang kondisyon. Adto dayon sa pinakaduol nga ospital."),
    (SUMMARY_CRITICAL_CONDITION, "Adunay timailhan sa posibleng emergency. Adto dayon sa pinakaduol nga ospital."),
    (SUMMARY_MODERATE, "Kinahanglan bantayan ang kondisyon. Magpatan-aw sa clinic sulod sa 24 ka oras ug padayon nga bantayi ang vital signs."),
    (SUMMARY_MODERATE_BREATHING, "Kinahanglan bantayan pag-ayo ang pagginhawa. Magpatan-aw sa clinic sulod sa 24 ka oras."),
    (SUMMARY_MILD, "Morag mild ang kondisyon karon. Pahulay, inom og tubig, ug bantayi ang sintomas."),
    (SUMMARY_UNABLE, "Dili makompleto ang assessment. Sulayi pag-usab o mangonsulta sa healthcare provider."),
];

lazy_static! {
    static ref TABLES: HashMap<PreferredLanguage, HashMap<&'static str, &'static str>> = {
        let mut tables = HashMap::new();
        tables.insert(PreferredLanguage::Tagalog, TAGALOG.iter().copied().collect());
        tables.insert(PreferredLanguage::Cebuano, CEBUANO.iter().copied().collect());
        tables
    };
}

/// Translate one English phrase; unknown phrases come back unchanged
pub fn translate_action(action: &str, language: PreferredLanguage) -> String {
    TABLES
        .get(&language)
        .and_then(|table| table.get(action))
        .filter(|translated| !translated.trim().is_empty())
        .map(|translated| translated.to_string())
        .unwrap_or_else(|| action.to_string())
}

pub fn translate_actions<S: AsRef<str>>(actions: &[S], language: PreferredLanguage) -> Vec<String> {
    actions
        .iter()
        .map(|a| translate_action(a.as_ref(), language))
        .collect()
}
