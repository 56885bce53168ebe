//! Output-language instructions for the rewrite prompt.

/// (code, display name, instruction written in that language)
const LANGUAGES: &[(&str, &str, &str)] = &[
    ("en", "English", "Write your entire response in English only."),
    ("es", "Spanish", "Escribe toda tu respuesta únicamente en español."),
    ("fr", "French", "Écrivez votre réponse entière uniquement en français."),
    ("de", "German", "Schreiben Sie Ihre gesamte Antwort nur auf Deutsch."),
    ("it", "Italian", "Scrivi la tua intera risposta solo in italiano."),
    ("pt", "Portuguese", "Escreva sua resposta inteira apenas em português."),
    ("zh", "Chinese", "请用中文写出你的完整回答。"),
    ("ja", "Japanese", "回答は全て日本語で書いてください。"),
    ("ko", "Korean", "답변은 모두 한국어로만 작성해 주세요."),
    ("ru", "Russian", "Напишите весь ваш ответ только на русском языке."),
    ("ar", "Arabic", "اكتب إجابتك الكاملة باللغة العربية فقط."),
    ("hi", "Hindi", "अपना पूरा उत्तर केवल हिंदी में लिखें।"),
    ("nl", "Dutch", "Schrijf je volledige antwoord alleen in het Nederlands."),
    ("sv", "Swedish", "Skriv hela ditt svar endast på svenska."),
    ("pl", "Polish", "Napisz całą swoją odpowiedź tylko po polsku."),
    ("tr", "Turkish", "Yanıtınızın tamamını yalnızca Türkçe yazın."),
    ("el", "Greek", "Γράψτε ολόκληρη την απάντησή σας μόνο στα ελληνικά."),
    ("he", "Hebrew", "כתוב את כל התשובה שלך בעברית בלבד."),
    ("th", "Thai", "เขียนคำตอบทั้งหมดของคุณเป็นภาษาไทยเท่านั้น"),
    ("vi", "Vietnamese", "Viết toàn bộ câu trả lời của bạn chỉ bằng tiếng Việt."),
    ("id", "Indonesian", "Tulis seluruh jawaban Anda hanya dalam bahasa Indonesia."),
    ("cs", "Czech", "Napište celou svou odpověď pouze v češtině."),
    ("da", "Danish", "Skriv hele dit svar kun på dansk."),
    ("fi", "Finnish", "Kirjoita koko vastauksesi vain suomeksi."),
    ("no", "Norwegian", "Skriv hele svaret ditt kun på norsk."),
    ("uk", "Ukrainian", "Напишіть всю вашу відповідь лише українською мовою."),
    ("ro", "Romanian", "Scrie întregul tău răspuns doar în limba română."),
    ("hu", "Hungarian", "Írja meg teljes válaszát csak magyarul."),
    ("bn", "Bengali", "আপনার সম্পূর্ণ উত্তর শুধুমাত্র বাংলায় লিখুন।"),
    ("tl", "Tagalog", "Isulat ang iyong buong sagot sa Tagalog lamang."),
    ("ms", "Malay", "Tulis keseluruhan jawapan anda dalam bahasa Melayu sahaja."),
    ("sw", "Swahili", "Andika jibu lako lote kwa Kiswahili pekee."),
    ("fa", "Persian", "پاسخ کامل خود را فقط به فارسی بنویسید."),
    ("ur", "Urdu", "اپنا پورا جواب صرف اردو میں لکھیں۔"),
    ("ta", "Tamil", "உங்கள் முழு பதிலையும் தமிழில் மட்டுமே எழுதுங்கள்."),
    ("gu", "Gujarati", "તમારો સંપૂર્ણ જવાબ ફક્ત ગુજરાતીમાં લખો."),
    ("mr", "Marathi", "तुमचे संपूर्ण उत्तर फक्त मराठीत लिहा."),
    ("te", "Telugu", "మీ పూర్తి సమాధానాన్ని తెలుగులో మాత్రమే వ్రాయండి."),
    ("bg", "Bulgarian", "Напишете целия си отговор само на български език."),
    ("hr", "Croatian", "Napišite cijeli svoj odgovor samo na hrvatskom jeziku."),
    ("sr", "Serbian", "Напишите цео свој одговор само на српском језику."),
    ("sk", "Slovak", "Napíšte celú svoju odpoveď iba v slovenčine."),
    ("sl", "Slovenian", "Napišite celoten odgovor samo v slovenščini."),
    ("lt", "Lithuanian", "Parašykite visą savo atsakymą tik lietuvių kalba."),
    ("lv", "Latvian", "Rakstiet visu savu atbildi tikai latviešu valodā."),
    ("et", "Estonian", "Kirjutage kogu oma vastus ainult eesti keeles."),
    ("sq", "Albanian", "Shkruani të gjithë përgjigjen tuaj vetëm në shqip."),
    ("mk", "Macedonian", "Напишете го целиот ваш одговор само на македонски јазик."),
    ("mn", "Mongolian", "Хариултаа бүхэлд нь зөвхөн монгол хэлээр бичнэ үү."),
    ("ka", "Georgian", "დაწერეთ თქვენი სრული პასუხი მხოლოდ ქართულად."),
    ("ca", "Catalan", "Escriu tota la teva resposta només en català."),
    ("eu", "Basque", "Idatzi zure erantzun osoa euskaraz soilik."),
    ("gl", "Galician", "Escribe toda a túa resposta só en galego."),
];

fn lookup(code: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    let primary = code.split(['-', '_']).next().unwrap_or(code);
    LANGUAGES.iter().find(|(c, _, _)| c.eq_ignore_ascii_case(primary))
}

/// Instruction telling the model to answer in `code`'s language.
///
/// Unknown codes get an empty instruction.
pub fn instruction_for(code: &str) -> &'static str {
    lookup(code).map(|(_, _, instruction)| *instruction).unwrap_or("")
}

/// English display name for `code`, or the code itself when unknown.
pub fn display_name(code: &str) -> String {
    lookup(code)
        .map(|(_, name, _)| name.to_string())
        .unwrap_or_else(|| code.to_string())
}
